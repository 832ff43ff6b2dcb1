use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrellisError {
    #[error("Remote API error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Ambiguous name '{name}': matches {candidates} entries")]
    Ambiguous { name: String, candidates: usize },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrellisError {
    /// Short message suitable for the status bar.
    pub fn user_message(&self) -> String {
        match self {
            TrellisError::Remote { status, message } if message.is_empty() => {
                format!("Request failed with status {}", status)
            }
            TrellisError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for TrellisError {
    fn from(err: serde_json::Error) -> Self {
        TrellisError::Serialization(err.to_string())
    }
}
