//! The browser seam the control loop drives.

use async_trait::async_trait;
use std::collections::HashSet;
use webpilot_core_types::{Observation, ScrollDirection};

/// Errors crossing the port are opaque to the loop, which only folds them
/// into outcome text.
pub type PortError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything the control loop needs from a browser.
///
/// The production implementation lives in `browser-actions`; the scripted
/// one below runs the loop without any browser at all.
#[async_trait]
pub trait BrowserPort: Send {
    /// Snapshot the active page into an observation, recovering the active
    /// page first if it died.
    async fn observe(&mut self) -> Result<Observation, PortError>;

    async fn click(&mut self, id: u32) -> Result<(), PortError>;
    async fn type_text(&mut self, id: u32, text: &str) -> Result<(), PortError>;
    async fn scroll(&mut self, direction: ScrollDirection) -> Result<(), PortError>;
    async fn navigate(&mut self, url: &str) -> Result<(), PortError>;
    async fn go_back(&mut self) -> Result<(), PortError>;
    async fn press_key(&mut self, key: &str) -> Result<(), PortError>;
    async fn close_tab(&mut self) -> Result<(), PortError>;
}

/// Deterministic browser used for tests and offline development.
///
/// Every invocation is appended to `log`; individual click identifiers and
/// whole operations can be scripted to fail.
#[derive(Debug, Default)]
pub struct ScriptedBrowser {
    observation: Option<Observation>,
    failing_clicks: HashSet<u32>,
    refuse_close_tab: bool,
    fail_observe: bool,
    /// Invocation log, e.g. `click(3)` or `navigate(https://…)`.
    pub log: Vec<String>,
}

impl ScriptedBrowser {
    pub fn new(observation: Observation) -> Self {
        Self {
            observation: Some(observation),
            ..Default::default()
        }
    }

    /// Make `click(id)` fail with a resolution error.
    pub fn fail_click(mut self, id: u32) -> Self {
        self.failing_clicks.insert(id);
        self
    }

    /// Make `close_tab` refuse as if only one page were open.
    pub fn refuse_close_tab(mut self) -> Self {
        self.refuse_close_tab = true;
        self
    }

    /// Make `observe` fail hard, as when no page can be created.
    pub fn fail_observe(mut self) -> Self {
        self.fail_observe = true;
        self
    }

    fn record(&mut self, entry: String) {
        self.log.push(entry);
    }
}

#[async_trait]
impl BrowserPort for ScriptedBrowser {
    async fn observe(&mut self) -> Result<Observation, PortError> {
        self.record("observe".to_string());
        if self.fail_observe {
            return Err("no usable page and creation failed".into());
        }
        Ok(self
            .observation
            .clone()
            .unwrap_or_else(|| Observation::placeholder("about:blank", "", "Page is empty")))
    }

    async fn click(&mut self, id: u32) -> Result<(), PortError> {
        self.record(format!("click({id})"));
        if self.failing_clicks.contains(&id) {
            return Err(format!("element {id} not found in current snapshot").into());
        }
        Ok(())
    }

    async fn type_text(&mut self, id: u32, text: &str) -> Result<(), PortError> {
        self.record(format!("type({id}, {text})"));
        Ok(())
    }

    async fn scroll(&mut self, direction: ScrollDirection) -> Result<(), PortError> {
        self.record(format!("scroll({})", direction.as_str()));
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<(), PortError> {
        self.record(format!("navigate({url})"));
        Ok(())
    }

    async fn go_back(&mut self) -> Result<(), PortError> {
        self.record("go_back".to_string());
        Ok(())
    }

    async fn press_key(&mut self, key: &str) -> Result<(), PortError> {
        self.record(format!("press({key})"));
        Ok(())
    }

    async fn close_tab(&mut self) -> Result<(), PortError> {
        self.record("close_tab".to_string());
        if self.refuse_close_tab {
            return Err("cannot close the only open tab; navigate instead".into());
        }
        Ok(())
    }
}
