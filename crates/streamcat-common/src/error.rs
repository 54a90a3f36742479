//! Common error types used throughout streamcat.

/// Common error type for streamcat.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The upstream metadata gateway failed or returned an error payload.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// A payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new Gateway error.
    pub fn gateway<S: Into<String>>(msg: S) -> Self {
        Self::Gateway(msg.into())
    }

    /// Create a new Decode error.
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
