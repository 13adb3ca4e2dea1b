//! Session ownership: the browser runtime, the single active page, and its
//! handle cache.

use cdp_session::{page, BrowserRuntime, Page, SessionConfig};
use dom_indexer::{indexer, HandleCache};
use tracing::{info, warn};
use webpilot_core_types::Observation;

use crate::config::ActionConfig;
use crate::errors::ActionError;

/// The one facade the control loop drives.
///
/// Exactly one page is active at a time, and the handle cache belongs to
/// that page. Switching pages goes through [`BrowserService::activate_page`]
/// which clears the cache wholesale.
pub struct BrowserService {
    pub(crate) runtime: BrowserRuntime,
    pub(crate) page: Option<Page>,
    pub(crate) cache: HandleCache,
    pub(crate) config: ActionConfig,
}

impl BrowserService {
    /// Launch (or attach to) a browser and pick up its initial page.
    pub async fn launch(
        session: &SessionConfig,
        config: ActionConfig,
    ) -> Result<Self, ActionError> {
        let runtime = BrowserRuntime::launch(session).await?;

        // Chromium opens with one default page; adopt it rather than
        // spawning a second window.
        let page = match runtime.pages().await {
            Ok(pages) if !pages.is_empty() => pages.into_iter().next(),
            _ => None,
        };
        let page = match page {
            Some(page) => page,
            None => runtime
                .new_page("about:blank")
                .await
                .map_err(|err| ActionError::SessionLost(err.to_string()))?,
        };

        if let Err(err) = page::apply_viewport(
            &page,
            session.viewport_width,
            session.viewport_height,
            config.info_timeout,
        )
        .await
        {
            warn!(target: "browser-actions", %err, "failed to set viewport");
        }

        Ok(Self {
            runtime,
            page: Some(page),
            cache: HandleCache::new(config.resolve_timeout),
            config,
        })
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    /// The current active page, cloned. Errors only when recovery has never
    /// produced a page at all.
    pub(crate) fn active_page(&self) -> Result<Page, ActionError> {
        self.page
            .clone()
            .ok_or_else(|| ActionError::SessionLost("no active page".to_string()))
    }

    /// Make sure some live page is active, adopting or creating one if the
    /// current one died. Transparent to the caller except when creation
    /// itself fails.
    pub(crate) async fn ensure_active_page(&mut self) -> Result<Page, ActionError> {
        if let Some(current) = &self.page {
            if page::is_alive(current, self.config.probe_timeout).await {
                return Ok(current.clone());
            }
            warn!(target: "browser-actions", "active page no longer answers, recovering");
            self.page = None;
            self.cache.invalidate_all();
        }

        if let Ok(pages) = self.runtime.pages().await {
            for candidate in pages {
                if page::is_alive(&candidate, self.config.probe_timeout).await {
                    info!(target: "browser-actions", "adopted another open page");
                    self.cache.invalidate_all();
                    self.page = Some(candidate.clone());
                    return Ok(candidate);
                }
            }
        }

        info!(target: "browser-actions", "all pages are gone, creating a fresh one");
        let fresh = self
            .runtime
            .new_page(&self.config.recovery_url)
            .await
            .map_err(|err| ActionError::SessionLost(err.to_string()))?;
        self.cache.invalidate_all();
        self.page = Some(fresh.clone());
        Ok(fresh)
    }

    /// Snapshot the active page into an observation.
    ///
    /// Starts a new identifier generation: everything the previous snapshot
    /// issued is dropped before the scan runs.
    pub async fn observe(&mut self) -> Result<Observation, ActionError> {
        let page = self.ensure_active_page().await?;
        self.cache.invalidate_all();

        let info = page::page_info(&page, self.config.info_timeout)
            .await
            .map_err(|err| ActionError::Observe(err.to_string()))?;

        // Give a busy page a short chance to settle; capture degrades to a
        // placeholder on its own if the page stays busy.
        page::wait_until_idle(&page, self.config.pre_scan_settle).await;

        let observation = indexer::capture(&page, &info, self.config.scan_timeout).await?;
        Ok(observation)
    }

    /// Switch the active page: best-effort bring-to-front, swap the
    /// reference, drop the handle generation, wait for quiet. Failures are
    /// logged and swallowed, since the page may legitimately be mid-transition.
    pub(crate) async fn activate_page(&mut self, target: Page) {
        if let Err(err) = page::bring_to_front(&target, self.config.activate_timeout).await {
            warn!(target: "browser-actions", %err, "bring-to-front failed during activation");
        }
        self.cache.invalidate_all();
        self.page = Some(target.clone());
        page::wait_until_idle(&target, self.config.activate_idle).await;
    }

    /// Shut the browser down, best effort.
    pub async fn shutdown(&mut self) {
        self.runtime.close().await;
    }
}
