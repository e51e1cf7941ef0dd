use std::time::Duration;

use thiserror::Error;

/// Failures of the text-generation sub-path.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("generation backend unavailable: {0}")]
    Unavailable(String),

    #[error("generation cancelled")]
    Cancelled,

    #[error("malformed generation: {reason}")]
    Malformed {
        reason: String,
        raw: String,
        candidate: Option<String>,
    },
}

impl GenerationError {
    /// Short stable label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "GenerationTimeout",
            Self::Unavailable(_) => "GenerationUnavailable",
            Self::Cancelled => "GenerationCancelled",
            Self::Malformed { .. } => "MalformedGeneration",
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest's own timeout is only the connect guard; the call deadline
        // is enforced by GenerationClient.
        Self::Unavailable(e.to_string())
    }
}
