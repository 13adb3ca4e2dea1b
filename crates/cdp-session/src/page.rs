//! Timeout-bounded page-level protocol calls.
//!
//! Free functions rather than a wrapper type: pages are cheap protocol
//! handles owned by the session facade, and every helper here takes its own
//! deadline so callers decide how long each call may block.

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::Page;
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::errors::SessionError;
use crate::keys;

/// Safety margin granted to the supervised quiescence worker before the
/// supervisor gives up on joining it.
const IDLE_SUPERVISOR_MARGIN: Duration = Duration::from_secs(1);

/// Basic page metadata used for observations and liveness probes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
}

/// Evaluate a script in the page, returning its JSON value.
///
/// A missing value (scripts that return `undefined`) comes back as
/// `Value::Null`.
pub async fn evaluate(page: &Page, script: &str, deadline: Duration) -> Result<Value, SessionError> {
    match timeout(deadline, page.evaluate(script)).await {
        Ok(Ok(result)) => Ok(result.value().cloned().unwrap_or(Value::Null)),
        Ok(Err(err)) => Err(SessionError::Evaluate(err.to_string())),
        Err(_) => Err(SessionError::timeout("Runtime.evaluate")),
    }
}

/// Fetch URL and title. The title read is best effort: a page mid-load may
/// refuse the evaluation, which degrades to an empty title.
pub async fn page_info(page: &Page, deadline: Duration) -> Result<PageInfo, SessionError> {
    let url = match timeout(deadline, page.url()).await {
        Ok(Ok(url)) => url.unwrap_or_else(|| "about:blank".to_string()),
        Ok(Err(err)) => return Err(SessionError::cdp(err)),
        Err(_) => return Err(SessionError::timeout("Page.url")),
    };

    let title = evaluate(page, "document.title", deadline)
        .await
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_default();

    Ok(PageInfo { url, title })
}

/// Liveness probe: does the page still answer metadata queries?
pub async fn is_alive(page: &Page, deadline: Duration) -> bool {
    matches!(timeout(deadline, page.url()).await, Ok(Ok(_)))
}

/// Navigate the page, bounded by `deadline`. Completion of the load is NOT
/// awaited here; use [`wait_until_idle`] afterwards.
pub async fn navigate(page: &Page, url: &str, deadline: Duration) -> Result<(), SessionError> {
    match timeout(deadline, page.goto(url)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(err)) => Err(SessionError::cdp(err)),
        Err(_) => Err(SessionError::timeout("Page.navigate")),
    }
}

/// Issue a history-back navigation.
pub async fn history_back(page: &Page, deadline: Duration) -> Result<(), SessionError> {
    evaluate(page, "history.back()", deadline).await.map(|_| ())
}

/// Wait for the page to reach a quiescent load state, bounded and supervised.
///
/// The wait runs on a spawned worker joined under `deadline` plus a margin:
/// if the wait path hangs or panics, the supervisor wins and the caller
/// continues. A timeout here is never an error; the page may simply be
/// long-lived quiet already.
pub async fn wait_until_idle(page: &Page, deadline: Duration) {
    let target = page.clone();
    let worker = tokio::spawn(async move {
        let _ = timeout(deadline, target.wait_for_navigation()).await;
    });
    let abort = worker.abort_handle();

    match timeout(deadline + IDLE_SUPERVISOR_MARGIN, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            // Worker panicked; absorbed here so the loop keeps running.
            warn!(target: "cdp-session", %err, "quiescence wait worker failed");
        }
        Err(_) => {
            abort.abort();
            debug!(target: "cdp-session", "quiescence wait exceeded its deadline, continuing");
        }
    }
}

/// Bring the page's tab to the foreground.
pub async fn bring_to_front(page: &Page, deadline: Duration) -> Result<(), SessionError> {
    match timeout(deadline, page.bring_to_front()).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(err)) => Err(SessionError::cdp(err)),
        Err(_) => Err(SessionError::timeout("Page.bringToFront")),
    }
}

/// Dispatch a full keyDown/char/keyUp sequence for a symbolic key name.
pub async fn press_key(page: &Page, name: &str, deadline: Duration) -> Result<(), SessionError> {
    let spec = keys::lookup(name)?;

    let down = DispatchKeyEventParams::builder()
        .r#type(DispatchKeyEventType::KeyDown)
        .key(spec.key)
        .code(spec.code)
        .windows_virtual_key_code(spec.virtual_code)
        .native_virtual_key_code(spec.virtual_code)
        .build()
        .map_err(SessionError::CdpIo)?;
    execute_input(page, down, deadline).await?;

    if let Some(text) = spec.text {
        let char_event = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::Char)
            .key(spec.key)
            .code(spec.code)
            .text(text)
            .build()
            .map_err(SessionError::CdpIo)?;
        execute_input(page, char_event, deadline).await?;
    }

    let up = DispatchKeyEventParams::builder()
        .r#type(DispatchKeyEventType::KeyUp)
        .key(spec.key)
        .code(spec.code)
        .windows_virtual_key_code(spec.virtual_code)
        .native_virtual_key_code(spec.virtual_code)
        .build()
        .map_err(SessionError::CdpIo)?;
    execute_input(page, up, deadline).await
}

async fn execute_input(
    page: &Page,
    params: DispatchKeyEventParams,
    deadline: Duration,
) -> Result<(), SessionError> {
    match timeout(deadline, page.execute(params)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(err)) => Err(SessionError::cdp(err)),
        Err(_) => Err(SessionError::timeout("Input.dispatchKeyEvent")),
    }
}

/// Apply the configured viewport through a device-metrics override.
pub async fn apply_viewport(
    page: &Page,
    width: u32,
    height: u32,
    deadline: Duration,
) -> Result<(), SessionError> {
    let params = SetDeviceMetricsOverrideParams::builder()
        .width(width as i64)
        .height(height as i64)
        .device_scale_factor(1.0)
        .mobile(false)
        .build()
        .map_err(SessionError::CdpIo)?;

    match timeout(deadline, page.execute(params)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(err)) => Err(SessionError::cdp(err)),
        Err(_) => Err(SessionError::timeout("Emulation.setDeviceMetricsOverride")),
    }
}
