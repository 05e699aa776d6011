//! Error types for the intake bot.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures talking to the chat platform (message delivery, attributes,
/// status, provisioning).
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("HTTP error during {operation}: {reason}")]
    Http { operation: String, reason: String },

    #[error("{operation} returned {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {operation}: {reason}")]
    InvalidResponse { operation: String, reason: String },
}

impl PlatformError {
    pub(crate) fn http(operation: &str, err: reqwest::Error) -> Self {
        Self::Http {
            operation: operation.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Conversation state store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("State for conversation {conversation_id} changed concurrently (expected version {expected:?}, found {found:?})")]
    Conflict {
        conversation_id: String,
        expected: Option<u64>,
        found: Option<u64>,
    },

    #[error("Store backend failure: {0}")]
    Backend(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
