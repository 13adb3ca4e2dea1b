use thiserror::Error;

/// Errors emitted by the indexing layer.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The scan script returned something that is not the expected JSON
    /// element array.
    #[error("snapshot script returned malformed data: {0}")]
    ScanParse(String),

    /// An identifier from the current generation could not be resolved to a
    /// live element.
    #[error("element {id} not found in current snapshot")]
    HandleNotFound { id: u32 },
}

impl IndexError {
    pub fn parse(err: impl std::fmt::Display) -> Self {
        Self::ScanParse(err.to_string())
    }
}
