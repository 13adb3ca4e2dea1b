use thiserror::Error;

/// Errors surfaced by the protocol session layer.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A protocol call did not answer within its deadline.
    #[error("protocol call timed out: {0}")]
    Timeout(String),

    /// The underlying CDP transport reported a failure.
    #[error("cdp i/o failure: {0}")]
    CdpIo(String),

    /// In-page script evaluation failed.
    #[error("script evaluation failed: {0}")]
    Evaluate(String),

    /// A symbolic key name outside the supported set was requested.
    #[error("unsupported key: {0}")]
    UnsupportedKey(String),
}

impl SessionError {
    /// Wrap a raw client error in the generic i/o variant.
    pub fn cdp(err: impl std::fmt::Display) -> Self {
        Self::CdpIo(err.to_string())
    }

    pub fn timeout(what: impl Into<String>) -> Self {
        Self::Timeout(what.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = SessionError::timeout("Runtime.evaluate");
        assert_eq!(err.to_string(), "protocol call timed out: Runtime.evaluate");

        let err = SessionError::UnsupportedKey("f13".into());
        assert_eq!(err.to_string(), "unsupported key: f13");
    }
}
