use thiserror::Error;

/// Top-level error type for meow.
#[derive(Debug, Error)]
pub enum MeowError {
    /// Error from the completion provider.
    #[error("provider error: {0}")]
    Provider(String),

    /// Error from the messaging transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Malformed operator input. Carries the message shown to the operator.
    #[error("{0}")]
    Usage(String),

    /// Operation the active transport does not offer.
    #[error("{0} is not supported by this transport")]
    Unsupported(&'static str),

    /// Diagnostic subprocess failure.
    #[error("diagnostics error: {0}")]
    Diagnostics(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
