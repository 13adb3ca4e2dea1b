//! The action primitives.
//!
//! Shared shape: resolve the handle, best-effort highlight, execute under a
//! bounded timeout, settle, invalidate the handle generation. Highlights
//! and quiescence waits are non-critical; their failures are logged and
//! swallowed; the action's own protocol call failing is the action failing.

use cdp_session::page;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};
use webpilot_core_types::ScrollDirection;

use crate::errors::ActionError;
use crate::scripts;
use crate::session::BrowserService;

impl BrowserService {
    /// Click an element by identifier.
    ///
    /// Falls back to a script-dispatched click when the native path fails.
    /// Afterwards, either promotes a newly opened tab to active or waits
    /// for the current page to settle. The handle generation is always
    /// invalidated, since the DOM is assumed changed.
    pub async fn click(&mut self, id: u32) -> Result<(), ActionError> {
        let page = self.active_page()?;
        let cfg = self.config.clone();

        // Tabs open before the click are not "new" afterwards.
        let known = self.runtime.open_targets().await.unwrap_or_default();

        let native = {
            let element = self
                .cache
                .resolve(&page, id)
                .await
                .map_err(|_| ActionError::ElementNotFound(id))?;

            if let Err(err) =
                page::evaluate(&page, &scripts::highlight_click_script(id), cfg.highlight_timeout)
                    .await
            {
                warn!(target: "browser-actions", %err, "click highlight failed");
            }

            match timeout(cfg.click_timeout, element.click()).await {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(err)) => Err(err.to_string()),
                Err(_) => Err("native click timed out".to_string()),
            }
        };

        if let Err(native_err) = native {
            warn!(target: "browser-actions", %native_err, "native click failed, trying script click");
            match page::evaluate(&page, &scripts::force_click_script(id), cfg.forced_click_timeout)
                .await
            {
                Ok(value) if value.as_bool() == Some(true) => {}
                Ok(_) => return Err(ActionError::ClickExhausted(native_err)),
                Err(err) => {
                    return Err(ActionError::ClickExhausted(format!(
                        "{native_err}; script click: {err}"
                    )))
                }
            }
        }

        match self
            .runtime
            .wait_for_new_page(&known, cfg.new_tab_wait, cfg.new_tab_poll)
            .await
        {
            Some(new_page) => {
                info!(target: "browser-actions", "click opened a new tab, promoting it");
                self.activate_page(new_page).await;
            }
            None => page::wait_until_idle(&page, cfg.post_click_idle).await,
        }

        self.cache.invalidate_all();
        Ok(())
    }

    /// Type text into an element, replacing whatever it held.
    pub async fn type_text(&mut self, id: u32, text: &str) -> Result<(), ActionError> {
        let page = self.active_page()?;
        let cfg = self.config.clone();

        {
            let element = self
                .cache
                .resolve(&page, id)
                .await
                .map_err(|_| ActionError::ElementNotFound(id))?;

            if let Err(err) =
                page::evaluate(&page, &scripts::highlight_type_script(id), cfg.highlight_timeout)
                    .await
            {
                warn!(target: "browser-actions", %err, "type highlight failed");
            }

            // Select existing content so the new text replaces it.
            if let Err(err) =
                page::evaluate(&page, &scripts::select_content_script(id), cfg.highlight_timeout)
                    .await
            {
                warn!(target: "browser-actions", %err, "could not select existing content");
            }

            let typed = timeout(cfg.input_timeout, async {
                element.click().await?;
                element.type_str(text).await
            })
            .await;

            match typed {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => return Err(ActionError::Input(err.to_string())),
                Err(_) => return Err(ActionError::Input("text input timed out".to_string())),
            }
        }

        self.cache.invalidate_all();
        Ok(())
    }

    /// Read an element's text. Non-mutating: the handle generation stays
    /// valid.
    pub async fn read_text(&mut self, id: u32) -> Result<String, ActionError> {
        let page = self.active_page()?;
        let cfg = self.config.clone();

        self.cache
            .resolve(&page, id)
            .await
            .map_err(|_| ActionError::ElementNotFound(id))?;

        if let Err(err) =
            page::evaluate(&page, &scripts::highlight_read_script(id), cfg.highlight_timeout).await
        {
            warn!(target: "browser-actions", %err, "read highlight failed");
        }

        let value = page::evaluate(&page, &scripts::read_text_script(id), cfg.read_timeout)
            .await
            .map_err(|err| ActionError::Protocol(err.to_string()))?;

        let text = value.as_str().unwrap_or_default().to_string();
        Ok(truncate_with_marker(text, cfg.read_cap))
    }

    /// Scroll the viewport up or down.
    pub async fn scroll(&mut self, direction: ScrollDirection) -> Result<(), ActionError> {
        let page = self.active_page()?;
        let cfg = self.config.clone();

        page::evaluate(&page, scripts::scroll_script(direction), cfg.scroll_timeout)
            .await
            .map_err(|err| ActionError::Protocol(err.to_string()))?;

        sleep(cfg.scroll_settle).await;
        self.cache.invalidate_all();
        Ok(())
    }

    /// Navigate the active page to a URL.
    pub async fn navigate(&mut self, url: &str) -> Result<(), ActionError> {
        let page = self.active_page()?;
        let cfg = self.config.clone();

        page::navigate(&page, url, cfg.navigate_timeout)
            .await
            .map_err(|err| ActionError::Navigation(err.to_string()))?;

        page::wait_until_idle(&page, cfg.post_navigate_idle).await;
        self.cache.invalidate_all();
        Ok(())
    }

    /// Go one entry back in history.
    pub async fn go_back(&mut self) -> Result<(), ActionError> {
        let page = self.active_page()?;
        let cfg = self.config.clone();

        page::history_back(&page, cfg.back_timeout)
            .await
            .map_err(|err| ActionError::Navigation(err.to_string()))?;

        page::wait_until_idle(&page, cfg.post_back_idle).await;
        self.cache.invalidate_all();
        Ok(())
    }

    /// Press a symbolic key on the active page.
    pub async fn press_key(&mut self, name: &str) -> Result<(), ActionError> {
        let page = self.active_page()?;
        let cfg = self.config.clone();

        // Let an animating page settle briefly before dispatching.
        page::wait_until_idle(&page, cfg.key_stability_wait).await;

        page::press_key(&page, name, cfg.key_timeout).await?;

        sleep(cfg.key_settle).await;
        self.cache.invalidate_all();
        Ok(())
    }

    /// Close the active tab and return to the most recently listed one.
    ///
    /// Refuses when it is the only tab; session state is left untouched
    /// and the caller should navigate instead.
    pub async fn close_tab(&mut self) -> Result<(), ActionError> {
        let pages = self
            .runtime
            .pages()
            .await
            .map_err(|err| ActionError::Protocol(err.to_string()))?;
        if pages.len() <= 1 {
            return Err(ActionError::LastTabRefused);
        }

        let current = self.active_page()?;
        if let Err(err) = current.close().await {
            warn!(target: "browser-actions", %err, "closing the active tab reported an error");
        }

        let remaining = self
            .runtime
            .pages()
            .await
            .map_err(|err| ActionError::Protocol(err.to_string()))?;
        let last = remaining
            .into_iter()
            .last()
            .ok_or_else(|| ActionError::SessionLost("all tabs closed".to_string()))?;

        self.activate_page(last).await;
        info!(target: "browser-actions", "tab closed, returned to the previous page");
        Ok(())
    }
}

/// Cap text at `cap` characters, marking the cut.
pub(crate) fn truncate_with_marker(text: String, cap: usize) -> String {
    if text.chars().count() > cap {
        let mut truncated: String = text.chars().take(cap).collect();
        truncated.push_str("...(truncated)");
        truncated
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_untouched() {
        assert_eq!(truncate_with_marker("hello".into(), 5000), "hello");
    }

    #[test]
    fn long_text_is_capped_with_marker() {
        let long = "x".repeat(6000);
        let result = truncate_with_marker(long, 5000);
        assert!(result.ends_with("...(truncated)"));
        assert_eq!(result.chars().count(), 5000 + "...(truncated)".chars().count());
    }

    #[test]
    fn cap_counts_characters_not_bytes() {
        let long = "ж".repeat(10);
        let result = truncate_with_marker(long, 4);
        assert!(result.starts_with("жжжж"));
        assert!(result.ends_with("...(truncated)"));
    }
}
