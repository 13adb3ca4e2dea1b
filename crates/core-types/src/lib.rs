//! Shared data model for the webpilot workspace.
//!
//! These types cross crate boundaries: the indexer produces [`Observation`]s,
//! the decision-maker produces [`ToolCall`]s, and the control loop archives
//! [`ActionRecord`]s. Everything here is plain data, with no I/O and no
//! protocol knowledge.

use serde::{Deserialize, Serialize};

/// One snapshot of the active page, formatted for decision-maker consumption.
///
/// An observation is ephemeral: the element identifiers embedded in
/// `dom_summary` are only valid until the next DOM-mutating action, after
/// which the whole generation is invalidated and a fresh observation must be
/// taken.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Observation {
    /// Current page URL.
    pub url: String,

    /// Page title (from document.title), may be empty.
    pub title: String,

    /// Ordered, line-oriented summary of the page. Interactive elements are
    /// prefixed `[N] <tag>`, context lines are indented without an
    /// identifier.
    pub dom_summary: String,
}

impl Observation {
    /// Observation carrying a placeholder summary instead of a real scan.
    ///
    /// Used when the page is still loading or empty; the cycle continues
    /// with whatever metadata was available.
    pub fn placeholder(url: impl Into<String>, title: impl Into<String>, note: &str) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            dom_summary: note.to_string(),
        }
    }
}

/// An intended action proposed by the decision-maker.
///
/// Parameters arrive loosely typed (numbers may be numeric strings); the
/// control loop decodes them into a closed command set before execution.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ToolCall {
    /// Action name as emitted by the decision-maker, e.g. `click`.
    pub name: String,

    /// Named parameters, shape depends on the action.
    #[serde(default)]
    pub args: serde_json::Map<String, serde_json::Value>,

    /// The decision-maker's justification attached to this call.
    #[serde(default)]
    pub reasoning: String,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style parameter attachment, mainly for tests and scripted
    /// decision-makers.
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }
}

/// Immutable record of one executed action, kept for the lifetime of a task.
///
/// The history feeds back into the decision-maker prompt so it can adapt to
/// failures; arguments are kept pre-serialized to spare repeated encoding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Justification the decision-maker attached to the action.
    pub reasoning: String,

    /// Action name, e.g. `click`.
    pub action: String,

    /// Arguments serialized as a JSON object string.
    pub args: String,

    /// Outcome text: `Success`, an error description, or an action-specific
    /// message.
    pub outcome: String,
}

/// Scroll direction accepted by the scroll action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_call_builder_attaches_args() {
        let call = ToolCall::new("click")
            .with_arg("id", 7)
            .with_reasoning("press the login button");

        assert_eq!(call.name, "click");
        assert_eq!(call.args.get("id"), Some(&serde_json::json!(7)));
        assert_eq!(call.reasoning, "press the login button");
    }

    #[test]
    fn tool_call_deserializes_without_optional_fields() {
        let call: ToolCall = serde_json::from_str(r#"{"name":"go_back"}"#).unwrap();
        assert_eq!(call.name, "go_back");
        assert!(call.args.is_empty());
        assert!(call.reasoning.is_empty());
    }

    #[test]
    fn scroll_direction_round_trips_snake_case() {
        let json = serde_json::to_string(&ScrollDirection::Down).unwrap();
        assert_eq!(json, "\"down\"");
        let back: ScrollDirection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ScrollDirection::Down);
        assert_eq!(ScrollDirection::Up.as_str(), "up");
    }

    #[test]
    fn placeholder_observation_carries_note() {
        let obs = Observation::placeholder("https://example.com", "Example", "Page is loading...");
        assert_eq!(obs.url, "https://example.com");
        assert_eq!(obs.dom_summary, "Page is loading...");
    }
}
