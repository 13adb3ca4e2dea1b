//! Capture one snapshot generation from the active page.

use std::time::Duration;

use cdp_session::{page, Page, PageInfo};
use serde_json::Value;
use tracing::{debug, warn};
use webpilot_core_types::Observation;

use crate::errors::IndexError;
use crate::model::{ScannedElement, MAX_SCAN_ITEMS};
use crate::scripts::SCAN_SCRIPT;

/// Summary shown when the scan could not run because the page is still
/// loading (script evaluation timed out or failed).
pub const LOADING_PLACEHOLDER: &str = "Page is still loading... (snapshot script did not answer)";

/// Summary shown when the scan ran but found nothing at all.
pub const EMPTY_PLACEHOLDER: &str = "Page is empty";

/// Run the scan and build the observation for this generation.
///
/// A failed or timed-out evaluation degrades to a placeholder
/// observation; the cycle must not die because a page is slow. A scan that returns
/// unparseable data is a real error.
pub async fn capture(
    page: &Page,
    info: &PageInfo,
    eval_deadline: Duration,
) -> Result<Observation, IndexError> {
    let value = match page::evaluate(page, SCAN_SCRIPT, eval_deadline).await {
        Ok(value) => value,
        Err(err) => {
            warn!(target: "dom-indexer", %err, "snapshot scan did not answer, emitting placeholder");
            return Ok(Observation::placeholder(
                &info.url,
                &info.title,
                LOADING_PLACEHOLDER,
            ));
        }
    };

    let elements = parse_scan(&value)?;
    if elements.is_empty() {
        return Ok(Observation::placeholder(
            &info.url,
            &info.title,
            EMPTY_PLACEHOLDER,
        ));
    }

    debug!(
        target: "dom-indexer",
        items = elements.len(),
        url = %info.url,
        "snapshot captured"
    );

    Ok(Observation {
        url: info.url.clone(),
        title: info.title.clone(),
        dom_summary: render_summary(&elements),
    })
}

/// Decode the scan's return value into elements.
///
/// The scan returns its item array as a JSON string; a null or empty value
/// means an empty page, anything unparseable is a [`IndexError::ScanParse`].
pub fn parse_scan(value: &Value) -> Result<Vec<ScannedElement>, IndexError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(raw) if raw.trim().is_empty() || raw.trim() == "null" => Ok(Vec::new()),
        Value::String(raw) => serde_json::from_str(raw).map_err(IndexError::parse),
        Value::Array(_) => {
            serde_json::from_value(value.clone()).map_err(IndexError::parse)
        }
        other => Err(IndexError::ScanParse(format!(
            "unexpected scan value: {other}"
        ))),
    }
}

/// Render the line-oriented summary: `[N] <tag> text` for addressable
/// items, indented `<tag> text` for context lines.
pub fn render_summary(elements: &[ScannedElement]) -> String {
    let mut summary = String::new();
    for element in elements {
        if element.interactive {
            summary.push_str(&format!("[{}] <{}> {}\n", element.id, element.tag, element.text));
        } else {
            summary.push_str(&format!("    <{}> {}\n", element.tag, element.text));
        }
    }

    if elements.len() >= MAX_SCAN_ITEMS {
        summary.push_str("\n... (truncated) ...\n");
    }

    if summary.is_empty() {
        summary.push_str("No elements found");
    }
    summary
}
