use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for launching (or attaching to) the browser.
///
/// Defaults are environment-driven so the binary can run unconfigured; the
/// CLI layer may override any field before launch.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Run the browser without a visible window.
    pub headless: bool,

    /// Profile directory; persisted between runs so logins survive.
    pub user_data_dir: PathBuf,

    /// Attach to an already-running browser over this debugger websocket URL
    /// instead of launching a fresh process.
    pub websocket_url: Option<String>,

    /// Pass `--no-sandbox` to the browser (required in some containers).
    pub no_sandbox: bool,

    /// Emulated viewport, applied per page via device-metrics override.
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Upper bound on browser process startup.
    pub launch_timeout: Duration,

    /// Deadline applied to protocol calls that have no narrower one.
    pub default_deadline: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: resolve_headless_default(),
            user_data_dir: default_profile_dir(),
            websocket_url: env_nonempty("WEBPILOT_WS_URL"),
            no_sandbox: env_flag("WEBPILOT_NO_SANDBOX"),
            viewport_width: 1920,
            viewport_height: 1080,
            launch_timeout: Duration::from_secs(30),
            default_deadline: Duration::from_secs(10),
        }
    }
}

fn resolve_headless_default() -> bool {
    // WEBPILOT_HEADLESS: "0", "false", "no", "off" mean headful.
    match env::var("WEBPILOT_HEADLESS") {
        Ok(value) => {
            let lower = value.to_ascii_lowercase();
            !matches!(lower.as_str(), "0" | "false" | "no" | "off")
        }
        Err(_) => false,
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
        .unwrap_or(false)
}

fn env_nonempty(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Err(_) => None,
    }
}

fn default_profile_dir() -> PathBuf {
    if let Ok(path) = env::var("WEBPILOT_USER_DATA_DIR") {
        return PathBuf::from(path);
    }
    PathBuf::from("user_data")
}
