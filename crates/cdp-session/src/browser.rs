//! Browser process ownership: launch/attach, page enumeration, new-tab
//! detection.

use std::collections::HashSet;
use std::fs;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout};
use tracing::{debug, info, trace, warn};

use crate::config::SessionConfig;
use crate::errors::SessionError;
use crate::TargetId;

/// A running browser plus the background task draining its event stream.
///
/// The runtime is the single owner of the browser process; pages handed out
/// from here are cheap clones of protocol handles.
pub struct BrowserRuntime {
    browser: Browser,
    handler_task: JoinHandle<()>,
    default_deadline: Duration,
}

impl BrowserRuntime {
    /// Launch a fresh browser, or attach to a running one when the config
    /// carries a debugger websocket URL.
    pub async fn launch(config: &SessionConfig) -> Result<Self, SessionError> {
        let (browser, mut handler) = if let Some(ws_url) = &config.websocket_url {
            info!(target: "cdp-session", url = %ws_url, "attaching to running browser");
            timeout(config.launch_timeout, Browser::connect(ws_url.clone()))
                .await
                .map_err(|_| SessionError::timeout("Browser.connect"))?
                .map_err(SessionError::cdp)?
        } else {
            let browser_config = build_browser_config(config)?;
            info!(
                target: "cdp-session",
                headless = config.headless,
                profile = %config.user_data_dir.display(),
                "launching browser"
            );
            timeout(config.launch_timeout, Browser::launch(browser_config))
                .await
                .map_err(|_| SessionError::timeout("Browser.launch"))?
                .map_err(SessionError::cdp)?
        };

        // The handler stream must be drained for any command to resolve.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                trace!(target: "cdp-session", ?event, "browser event");
            }
            debug!(target: "cdp-session", "browser event stream ended");
        });

        Ok(Self {
            browser,
            handler_task,
            default_deadline: config.default_deadline,
        })
    }

    /// All currently open pages, in protocol listing order.
    pub async fn pages(&self) -> Result<Vec<Page>, SessionError> {
        match timeout(self.default_deadline, self.browser.pages()).await {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(err)) => Err(SessionError::cdp(err)),
            Err(_) => Err(SessionError::timeout("Target.getTargets")),
        }
    }

    /// Create a new page at the given URL.
    pub async fn new_page(&self, url: &str) -> Result<Page, SessionError> {
        match timeout(self.default_deadline, self.browser.new_page(url)).await {
            Ok(Ok(page)) => Ok(page),
            Ok(Err(err)) => Err(SessionError::cdp(err)),
            Err(_) => Err(SessionError::timeout("Target.createTarget")),
        }
    }

    /// Snapshot of the identifiers of every open page, taken before actions
    /// that may spawn a tab.
    pub async fn open_targets(&self) -> Result<HashSet<TargetId>, SessionError> {
        let pages = self.pages().await?;
        Ok(pages.iter().map(|p| p.target_id().clone()).collect())
    }

    /// Poll for a page whose identifier was not in `known`, up to `total`.
    ///
    /// Returns `None` when no new page appeared before the deadline; listing
    /// failures during the poll are skipped, not fatal.
    pub async fn wait_for_new_page(
        &self,
        known: &HashSet<TargetId>,
        total: Duration,
        poll: Duration,
    ) -> Option<Page> {
        let deadline = tokio::time::sleep(total);
        tokio::pin!(deadline);
        let mut ticker = interval(poll);

        loop {
            tokio::select! {
                _ = &mut deadline => return None,
                _ = ticker.tick() => {
                    let pages = match self.pages().await {
                        Ok(pages) => pages,
                        Err(err) => {
                            debug!(target: "cdp-session", %err, "page listing failed during new-tab poll");
                            continue;
                        }
                    };
                    if let Some(page) = pages.into_iter().find(|p| !known.contains(p.target_id())) {
                        return Some(page);
                    }
                }
            }
        }
    }

    /// Shut the browser down, best effort.
    pub async fn close(&mut self) {
        if let Err(err) = self.browser.close().await {
            warn!(target: "cdp-session", %err, "browser close failed");
        }
        self.handler_task.abort();
    }
}

impl Drop for BrowserRuntime {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

fn build_browser_config(config: &SessionConfig) -> Result<BrowserConfig, SessionError> {
    if let Err(err) = fs::create_dir_all(&config.user_data_dir) {
        return Err(SessionError::CdpIo(format!(
            "failed to ensure user-data-dir {}: {err}",
            config.user_data_dir.display()
        )));
    }

    let mut builder = BrowserConfig::builder()
        .request_timeout(config.default_deadline)
        .launch_timeout(config.launch_timeout)
        .window_size(config.viewport_width, config.viewport_height)
        .user_data_dir(&config.user_data_dir)
        .args(vec![
            "--disable-blink-features=AutomationControlled",
            "--disable-infobars",
            "--disable-background-networking",
            "--disable-popup-blocking",
            "--no-first-run",
            "--no-default-browser-check",
            "--password-store=basic",
        ]);

    if !config.headless {
        builder = builder.with_head();
    }
    if config.no_sandbox {
        builder = builder.no_sandbox();
    }

    builder
        .build()
        .map_err(|err| SessionError::CdpIo(format!("browser config error: {err}")))
}
