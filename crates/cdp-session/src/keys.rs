//! Mapping from symbolic key names to CDP key-event parameters.

use crate::errors::SessionError;

/// Everything needed to synthesize keyDown/char/keyUp events for one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySpec {
    /// DOM `key` value, e.g. `Enter`.
    pub key: &'static str,
    /// DOM `code` value.
    pub code: &'static str,
    /// Text payload for keys that produce characters; triggers a `char`
    /// event between down and up.
    pub text: Option<&'static str>,
    /// Windows/native virtual key code.
    pub virtual_code: i64,
}

/// Resolve a symbolic key name to its event parameters.
///
/// The accepted set is closed; names are matched case-insensitively and both
/// `arrow_down` and `ArrowDown` spellings are recognized. Anything else is
/// an [`SessionError::UnsupportedKey`].
pub fn lookup(name: &str) -> Result<KeySpec, SessionError> {
    let normalized = name.trim().to_ascii_lowercase();
    let spec = match normalized.as_str() {
        "enter" => KeySpec {
            key: "Enter",
            code: "Enter",
            text: Some("\r"),
            virtual_code: 13,
        },
        "escape" => KeySpec {
            key: "Escape",
            code: "Escape",
            text: None,
            virtual_code: 27,
        },
        "tab" => KeySpec {
            key: "Tab",
            code: "Tab",
            text: Some("\t"),
            virtual_code: 9,
        },
        "backspace" => KeySpec {
            key: "Backspace",
            code: "Backspace",
            text: None,
            virtual_code: 8,
        },
        "arrow_down" | "arrowdown" => KeySpec {
            key: "ArrowDown",
            code: "ArrowDown",
            text: None,
            virtual_code: 40,
        },
        "arrow_up" | "arrowup" => KeySpec {
            key: "ArrowUp",
            code: "ArrowUp",
            text: None,
            virtual_code: 38,
        },
        "space" => KeySpec {
            key: " ",
            code: "Space",
            text: Some(" "),
            virtual_code: 32,
        },
        _ => return Err(SessionError::UnsupportedKey(name.to_string())),
    };
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_set_is_closed() {
        for name in [
            "enter",
            "escape",
            "tab",
            "backspace",
            "arrow_down",
            "arrow_up",
            "space",
        ] {
            assert!(lookup(name).is_ok(), "{name} should map");
        }

        for name in ["f13", "delete", "ctrl", ""] {
            assert!(matches!(
                lookup(name),
                Err(SessionError::UnsupportedKey(_))
            ));
        }
    }

    #[test]
    fn camel_case_spellings_accepted() {
        assert_eq!(lookup("ArrowDown").unwrap().virtual_code, 40);
        assert_eq!(lookup("Enter").unwrap().text, Some("\r"));
    }

    #[test]
    fn text_keys_carry_payload() {
        assert_eq!(lookup("tab").unwrap().text, Some("\t"));
        assert_eq!(lookup("space").unwrap().text, Some(" "));
        assert_eq!(lookup("escape").unwrap().text, None);
    }
}
