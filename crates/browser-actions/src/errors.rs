use thiserror::Error;

/// Errors emitted by action primitives and the session facade.
///
/// These become per-action outcome text in the control loop; only
/// [`ActionError::SessionLost`] during observation is fatal for a task.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The identifier could not be resolved in the current snapshot
    /// generation.
    #[error("element {0} not found in current snapshot")]
    ElementNotFound(u32),

    /// Native and script-dispatched click both failed.
    #[error("all click methods failed: {0}")]
    ClickExhausted(String),

    /// Text input failed or timed out.
    #[error("text input failed: {0}")]
    Input(String),

    /// Navigation itself failed or timed out.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// A key name outside the supported set.
    #[error("unsupported key: {0}")]
    UnsupportedKey(String),

    /// Refusal to close the last remaining tab.
    #[error("cannot close the only open tab; navigate instead")]
    LastTabRefused,

    /// No page is usable and a replacement could not be created.
    #[error("browser session lost: {0}")]
    SessionLost(String),

    /// The snapshot could not be taken.
    #[error("observation failed: {0}")]
    Observe(String),

    /// Any other protocol-level failure.
    #[error("protocol failure: {0}")]
    Protocol(String),
}

impl From<cdp_session::SessionError> for ActionError {
    fn from(err: cdp_session::SessionError) -> Self {
        match err {
            cdp_session::SessionError::UnsupportedKey(key) => Self::UnsupportedKey(key),
            other => Self::Protocol(other.to_string()),
        }
    }
}

impl From<dom_indexer::IndexError> for ActionError {
    fn from(err: dom_indexer::IndexError) -> Self {
        match err {
            dom_indexer::IndexError::HandleNotFound { id } => Self::ElementNotFound(id),
            other => Self::Observe(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusal_tells_the_caller_what_to_do_instead() {
        assert!(ActionError::LastTabRefused.to_string().contains("navigate instead"));
    }

    #[test]
    fn index_errors_map_to_action_variants() {
        let err: ActionError = dom_indexer::IndexError::HandleNotFound { id: 9 }.into();
        assert!(matches!(err, ActionError::ElementNotFound(9)));

        let err: ActionError = dom_indexer::IndexError::ScanParse("bad json".into()).into();
        assert!(matches!(err, ActionError::Observe(_)));
    }

    #[test]
    fn unsupported_key_survives_the_session_boundary() {
        let err: ActionError = cdp_session::SessionError::UnsupportedKey("f13".into()).into();
        assert!(matches!(err, ActionError::UnsupportedKey(_)));
    }
}
