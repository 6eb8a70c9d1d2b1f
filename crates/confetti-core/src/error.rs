//! Error types for confetti

use thiserror::Error;

/// The main error type for confetti operations.
///
/// The simulation itself never fails; these errors only surface while loading
/// configuration or talking to the host display tree.
#[derive(Debug, Error)]
pub enum ConfettiError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Invalid field type for {field}: expected {expected}")]
    InvalidFieldType { field: String, expected: String },

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Host error: {0}")]
    HostError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for confetti operations
pub type Result<T> = std::result::Result<T, ConfettiError>;

impl From<toml::de::Error> for ConfettiError {
    fn from(err: toml::de::Error) -> Self {
        ConfettiError::TomlParseError(err.to_string())
    }
}
