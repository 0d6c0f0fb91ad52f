use thiserror::Error;

/// Top-level error type for Emojify.
#[derive(Debug, Error)]
pub enum EmojifyError {
    /// Error from a remote language model backend.
    #[error("provider error: {0}")]
    Provider(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Config file exists but could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
