//! Decoding intended actions into the closed command set.
//!
//! The decision-maker speaks loosely typed JSON; this module is the single
//! place where that surface is validated and coerced. Numeric parameters may
//! arrive as native numbers, numeric strings, or decimal strings, and all are
//! accepted here and nowhere else.

use serde_json::{Map, Value};
use thiserror::Error;
use webpilot_core_types::{ScrollDirection, ToolCall};

/// Why a tool call could not be decoded. Decode failures become the
/// action's outcome text; they never abort a batch.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("missing or invalid '{0}' parameter")]
    Parameter(&'static str),
}

/// The closed set of operations the loop knows how to execute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Click { id: u32 },
    TypeText { id: u32, text: String },
    Scroll { direction: ScrollDirection },
    Navigate { url: String },
    Press { key: String },
    GoBack,
    /// Append a note to history without touching the page.
    Memorize { info: Option<String> },
    /// Signal task completion with a final report.
    SubmitResult { report: Option<String> },
}

impl Command {
    /// Decode a wire-shaped tool call. Unrecognized names and malformed
    /// required parameters are representable errors, not panics.
    pub fn decode(call: &ToolCall) -> Result<Self, DecodeError> {
        let args = &call.args;
        match call.name.as_str() {
            "click" => Ok(Self::Click {
                id: element_id(args).ok_or(DecodeError::Parameter("id"))?,
            }),
            "type" => Ok(Self::TypeText {
                id: element_id(args).ok_or(DecodeError::Parameter("id"))?,
                text: str_arg(args, "text").ok_or(DecodeError::Parameter("text"))?,
            }),
            "scroll" => {
                let direction = match str_arg(args, "direction") {
                    None => ScrollDirection::Down,
                    Some(raw) => match raw.as_str() {
                        "down" => ScrollDirection::Down,
                        "up" => ScrollDirection::Up,
                        _ => return Err(DecodeError::Parameter("direction")),
                    },
                };
                Ok(Self::Scroll { direction })
            }
            "navigate" => Ok(Self::Navigate {
                url: str_arg(args, "url").ok_or(DecodeError::Parameter("url"))?,
            }),
            "press" => Ok(Self::Press {
                key: str_arg(args, "key").ok_or(DecodeError::Parameter("key"))?,
            }),
            "go_back" => Ok(Self::GoBack),
            "memorize" => Ok(Self::Memorize {
                info: str_arg(args, "info"),
            }),
            // Both the canonical name and the legacy alias are accepted,
            // as are older report parameter keys.
            "submit_task_result" | "done" => {
                let report = str_arg(args, "final_report")
                    .or_else(|| str_arg(args, "answer"))
                    .or_else(|| str_arg(args, "result"));
                Ok(Self::SubmitResult { report })
            }
            other => Err(DecodeError::UnknownTool(other.to_string())),
        }
    }
}

/// Extract an element identifier, applying the numeric coercion policy.
fn element_id(args: &Map<String, Value>) -> Option<u32> {
    int_arg(args, "id").and_then(|id| u32::try_from(id).ok())
}

/// Integer parameter: native number, integer string, or decimal string.
fn int_arg(args: &Map<String, Value>, key: &str) -> Option<i64> {
    match args.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .parse::<i64>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().map(|f| f as i64)),
        _ => None,
    }
}

/// String parameter: literal strings only, no coercion.
fn str_arg(args: &Map<String, Value>, key: &str) -> Option<String> {
    match args.get(key)? {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(name: &str, args: serde_json::Value) -> ToolCall {
        ToolCall {
            name: name.to_string(),
            args: args.as_object().cloned().unwrap_or_default(),
            reasoning: String::new(),
        }
    }

    #[test]
    fn click_accepts_native_number() {
        let cmd = Command::decode(&call("click", json!({"id": 42}))).unwrap();
        assert_eq!(cmd, Command::Click { id: 42 });
    }

    #[test]
    fn click_coerces_numeric_strings() {
        let cmd = Command::decode(&call("click", json!({"id": "42"}))).unwrap();
        assert_eq!(cmd, Command::Click { id: 42 });

        let cmd = Command::decode(&call("click", json!({"id": "42.0"}))).unwrap();
        assert_eq!(cmd, Command::Click { id: 42 });

        let cmd = Command::decode(&call("click", json!({"id": 42.0}))).unwrap();
        assert_eq!(cmd, Command::Click { id: 42 });
    }

    #[test]
    fn click_rejects_garbage_id() {
        let err = Command::decode(&call("click", json!({"id": "abc"}))).unwrap_err();
        assert_eq!(err, DecodeError::Parameter("id"));

        let err = Command::decode(&call("click", json!({}))).unwrap_err();
        assert_eq!(err, DecodeError::Parameter("id"));

        let err = Command::decode(&call("click", json!({"id": -3}))).unwrap_err();
        assert_eq!(err, DecodeError::Parameter("id"));
    }

    #[test]
    fn type_requires_literal_text() {
        let cmd = Command::decode(&call("type", json!({"id": "7", "text": "hello"}))).unwrap();
        assert_eq!(
            cmd,
            Command::TypeText {
                id: 7,
                text: "hello".to_string()
            }
        );

        // Numbers are not coerced into strings.
        let err = Command::decode(&call("type", json!({"id": 7, "text": 99}))).unwrap_err();
        assert_eq!(err, DecodeError::Parameter("text"));
    }

    #[test]
    fn scroll_defaults_down_and_rejects_unknown_direction() {
        assert_eq!(
            Command::decode(&call("scroll", json!({}))).unwrap(),
            Command::Scroll {
                direction: ScrollDirection::Down
            }
        );
        assert_eq!(
            Command::decode(&call("scroll", json!({"direction": "up"}))).unwrap(),
            Command::Scroll {
                direction: ScrollDirection::Up
            }
        );
        assert_eq!(
            Command::decode(&call("scroll", json!({"direction": "sideways"}))).unwrap_err(),
            DecodeError::Parameter("direction")
        );
    }

    #[test]
    fn submit_result_accepts_alias_and_legacy_keys() {
        let cmd =
            Command::decode(&call("submit_task_result", json!({"final_report": "Order placed"})))
                .unwrap();
        assert_eq!(
            cmd,
            Command::SubmitResult {
                report: Some("Order placed".to_string())
            }
        );

        let cmd = Command::decode(&call("done", json!({"answer": "42"}))).unwrap();
        assert_eq!(
            cmd,
            Command::SubmitResult {
                report: Some("42".to_string())
            }
        );

        let cmd = Command::decode(&call("done", json!({"result": "ok"}))).unwrap();
        assert_eq!(
            cmd,
            Command::SubmitResult {
                report: Some("ok".to_string())
            }
        );

        let cmd = Command::decode(&call("done", json!({}))).unwrap();
        assert_eq!(cmd, Command::SubmitResult { report: None });
    }

    #[test]
    fn unknown_tool_is_a_representable_error() {
        let err = Command::decode(&call("teleport", json!({}))).unwrap_err();
        assert_eq!(err, DecodeError::UnknownTool("teleport".to_string()));
    }
}
