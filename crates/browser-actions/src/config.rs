use std::time::Duration;

/// Timings and destinations for the action primitives.
///
/// Every protocol call an action makes is bounded by one of these; none of
/// them may block the control loop indefinitely.
#[derive(Clone, Debug)]
pub struct ActionConfig {
    /// Destination for pages created during session recovery.
    pub recovery_url: String,

    /// Liveness probe on the active page.
    pub probe_timeout: Duration,

    /// URL/title metadata reads.
    pub info_timeout: Duration,

    /// Quiet-down wait before injecting the scan.
    pub pre_scan_settle: Duration,

    /// Snapshot script evaluation.
    pub scan_timeout: Duration,

    /// Lazy handle resolution per identifier.
    pub resolve_timeout: Duration,

    /// Best-effort visual highlights.
    pub highlight_timeout: Duration,

    /// Native element click.
    pub click_timeout: Duration,

    /// Script-dispatched fallback click.
    pub forced_click_timeout: Duration,

    /// Total wait for a click-spawned tab to appear, and the poll interval
    /// while waiting.
    pub new_tab_wait: Duration,
    pub new_tab_poll: Duration,

    /// Load-quiescence wait after a click that stayed on the same page.
    pub post_click_idle: Duration,

    /// Focus plus text entry.
    pub input_timeout: Duration,

    /// Element text reads, and the cap applied to what comes back.
    pub read_timeout: Duration,
    pub read_cap: usize,

    /// Scroll dispatch and the settle pause after it.
    pub scroll_timeout: Duration,
    pub scroll_settle: Duration,

    /// Navigation is network-bound and gets the most generous bound.
    pub navigate_timeout: Duration,
    pub post_navigate_idle: Duration,

    /// History-back dispatch and its settle.
    pub back_timeout: Duration,
    pub post_back_idle: Duration,

    /// Pre-dispatch stability wait, dispatch bound, and settle for key
    /// presses.
    pub key_stability_wait: Duration,
    pub key_timeout: Duration,
    pub key_settle: Duration,

    /// Bring-to-front and the idle wait when switching pages.
    pub activate_timeout: Duration,
    pub activate_idle: Duration,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            recovery_url: "https://www.google.com".to_string(),
            probe_timeout: Duration::from_secs(1),
            info_timeout: Duration::from_secs(2),
            pre_scan_settle: Duration::from_secs(2),
            scan_timeout: Duration::from_secs(5),
            resolve_timeout: Duration::from_secs(2),
            highlight_timeout: Duration::from_secs(2),
            click_timeout: Duration::from_secs(5),
            forced_click_timeout: Duration::from_secs(3),
            new_tab_wait: Duration::from_secs(3),
            new_tab_poll: Duration::from_millis(300),
            post_click_idle: Duration::from_secs(2),
            input_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(2),
            read_cap: 5000,
            scroll_timeout: Duration::from_secs(3),
            scroll_settle: Duration::from_millis(500),
            navigate_timeout: Duration::from_secs(15),
            post_navigate_idle: Duration::from_secs(5),
            back_timeout: Duration::from_secs(5),
            post_back_idle: Duration::from_secs(3),
            key_stability_wait: Duration::from_millis(300),
            key_timeout: Duration::from_secs(3),
            key_settle: Duration::from_millis(500),
            activate_timeout: Duration::from_secs(3),
            activate_idle: Duration::from_secs(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_gets_the_most_generous_bound() {
        let cfg = ActionConfig::default();
        assert!(cfg.navigate_timeout > cfg.click_timeout);
        assert!(cfg.navigate_timeout > cfg.scan_timeout);
        assert!(cfg.probe_timeout <= cfg.info_timeout);
    }
}
