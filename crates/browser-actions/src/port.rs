//! Wiring the facade into the control loop's browser seam.

use agent_runtime::{BrowserPort, PortError};
use async_trait::async_trait;
use webpilot_core_types::{Observation, ScrollDirection};

use crate::session::BrowserService;

#[async_trait]
impl BrowserPort for BrowserService {
    async fn observe(&mut self) -> Result<Observation, PortError> {
        Ok(BrowserService::observe(self).await?)
    }

    async fn click(&mut self, id: u32) -> Result<(), PortError> {
        Ok(BrowserService::click(self, id).await?)
    }

    async fn type_text(&mut self, id: u32, text: &str) -> Result<(), PortError> {
        Ok(BrowserService::type_text(self, id, text).await?)
    }

    async fn scroll(&mut self, direction: ScrollDirection) -> Result<(), PortError> {
        Ok(BrowserService::scroll(self, direction).await?)
    }

    async fn navigate(&mut self, url: &str) -> Result<(), PortError> {
        Ok(BrowserService::navigate(self, url).await?)
    }

    async fn go_back(&mut self) -> Result<(), PortError> {
        Ok(BrowserService::go_back(self).await?)
    }

    async fn press_key(&mut self, key: &str) -> Result<(), PortError> {
        Ok(BrowserService::press_key(self, key).await?)
    }

    async fn close_tab(&mut self) -> Result<(), PortError> {
        Ok(BrowserService::close_tab(self).await?)
    }
}
