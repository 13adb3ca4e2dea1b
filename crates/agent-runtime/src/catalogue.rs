//! The declarative catalogue of permitted actions, in the function-calling
//! schema the decision-maker consumes.
//!
//! This is the single source the decision-maker sees; the decoder in
//! [`crate::command`] recognizes exactly these names (plus the `done`
//! alias) and degrades anything else to a reported error.

use serde_json::{json, Value};

/// Tool definitions attached to every decision request.
pub fn action_catalogue() -> Vec<Value> {
    vec![
        json!({
            "type": "function",
            "function": {
                "name": "click",
                "description": "Click an element (link, button, checkbox).",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "integer",
                            "description": "Element ID from the DOM summary (the number in square brackets)."
                        }
                    },
                    "required": ["id"]
                }
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": "type",
                "description": "Type text into an input field, replacing its current content.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "integer",
                            "description": "Element ID of the input or textarea."
                        },
                        "text": {
                            "type": "string",
                            "description": "The text to enter."
                        }
                    },
                    "required": ["id", "text"]
                }
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": "scroll",
                "description": "Scroll the page when the element you need is not visible.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "direction": {
                            "type": "string",
                            "description": "Scroll direction.",
                            "enum": ["up", "down"]
                        }
                    },
                    "required": ["direction"]
                }
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": "navigate",
                "description": "Go to a specific URL. Use to start a task or when a link is not clickable.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "url": {
                            "type": "string",
                            "description": "Full URL, e.g. https://example.com."
                        }
                    },
                    "required": ["url"]
                }
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": "press",
                "description": "Press a special key (for example enter after typing a query).",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "key": {
                            "type": "string",
                            "description": "Key name.",
                            "enum": ["enter", "escape", "tab", "backspace", "arrow_down", "arrow_up", "space"]
                        }
                    },
                    "required": ["key"]
                }
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": "go_back",
                "description": "Navigate one entry back in the browser history.",
                "parameters": {
                    "type": "object",
                    "properties": {}
                }
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": "memorize",
                "description": "Save an important fact to memory (e.g. the content of a message or an order number).",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "info": {
                            "type": "string",
                            "description": "The fact or data to remember."
                        }
                    },
                    "required": ["info"]
                }
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": "submit_task_result",
                "description": "Call this to hand in the final report and finish the task.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "final_report": {
                            "type": "string",
                            "description": "Detailed task result for the user."
                        }
                    },
                    "required": ["final_report"]
                }
            }
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, DecodeError};
    use webpilot_core_types::ToolCall;

    #[test]
    fn every_catalogue_name_is_recognized_by_the_decoder() {
        for tool in action_catalogue() {
            let name = tool["function"]["name"].as_str().unwrap().to_string();
            let call = ToolCall {
                name,
                args: Default::default(),
                reasoning: String::new(),
            };
            // Missing parameters are fine here; an unknown name is not.
            match Command::decode(&call) {
                Ok(_) | Err(DecodeError::Parameter(_)) => {}
                Err(DecodeError::UnknownTool(name)) => {
                    panic!("catalogue advertises unrecognized tool '{name}'")
                }
            }
        }
    }

    #[test]
    fn catalogue_is_the_closed_permitted_set() {
        let names: Vec<_> = action_catalogue()
            .iter()
            .map(|t| t["function"]["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "click",
                "type",
                "scroll",
                "navigate",
                "press",
                "go_back",
                "memorize",
                "submit_task_result"
            ]
        );
    }
}
