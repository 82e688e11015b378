/// Errors returned by an [`AnalysisService`](crate::AnalysisService) before
/// the controller turns them into an outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Connection, timeout, or body read failure.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// The service answered with something the client could not interpret.
    #[error("protocol error: {message}")]
    Protocol { message: String },
}

impl ServiceError {
    /// Creates a transport-level error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a protocol-level error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Returns the human-readable message for this error.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message } | Self::Protocol { message } => message,
        }
    }
}

/// Top-level error type for the public livecheck API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// Missing stream URL or credential. Nothing is recorded or sent.
    #[error("validation error: {0}")]
    Validation(String),
    /// Missing or invalid service configuration. No request is sent.
    #[error("config error: {0}")]
    Config(String),
    /// The service answered with a non-success status.
    #[error("API error {status_code}: {body_text}")]
    HttpRejected { status_code: u16, body_text: String },
    /// Network or response parsing failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// The submission was cancelled or superseded before it finished.
    #[error("cancelled")]
    Cancelled,
}

impl From<ServiceError> for CheckError {
    fn from(value: ServiceError) -> Self {
        CheckError::Transport(value.message().to_string())
    }
}
