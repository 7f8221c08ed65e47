//! Error types for the chassis controller

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Chassis controller error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration parse error
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration serialization error
    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Inbound line longer than the document capacity
    #[error("Message too large: {len} bytes (max {max})")]
    MessageTooLarge {
        /// Observed length in bytes
        len: usize,
        /// Document capacity in bytes
        max: usize,
    },

    /// Well-formed JSON that is not a command document
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
