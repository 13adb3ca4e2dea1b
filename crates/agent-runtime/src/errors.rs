use thiserror::Error;

/// Errors emitted by the agent-runtime crate.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The decision-maker transport failed (network, HTTP status, etc.).
    #[error("decision request failed: {0}")]
    Decision(String),

    /// The decision-maker answered, but its payload could not be decoded.
    #[error("decision response malformed: {0}")]
    MalformedDecision(String),
}

impl AgentError {
    /// Helper for transport-level failures.
    pub fn decision(message: impl Into<String>) -> Self {
        Self::Decision(message.into())
    }

    /// Helper for undecodable responses.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDecision(message.into())
    }
}
