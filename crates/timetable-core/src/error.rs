use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load dataset: {0}")]
    Load(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TimetableError {
    /// Short error code string sent to clients in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            TimetableError::Config(_) => "CONFIG_ERROR",
            TimetableError::Load(_) => "LOAD_ERROR",
            TimetableError::InvalidParameter(_) => "INVALID_PARAMETER",
            TimetableError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// True for errors caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TimetableError::InvalidParameter(_))
    }
}

pub type Result<T> = std::result::Result<T, TimetableError>;
