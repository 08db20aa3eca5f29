//! Error handling module.
//!
//! Token parsing has its own error type so callers can decide whether a
//! malformed token is fatal. Configuration and serialization failures are
//! folded into [`AppError`], which carries a numeric [`ErrorCode`].

pub mod codes;

pub use codes::{ErrorCategory, ErrorCode};

/// Failure to decode a canonical token string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Input is not exactly 20 bytes long.
    #[error("Invalid token length: expected 20, got {0}")]
    InvalidLength(usize),

    /// Input contains a byte outside `0-9a-v`.
    #[error("Invalid token character {character:?} at position {position}")]
    InvalidCharacter {
        /// Offending character.
        character: char,
        /// Byte offset in the input.
        position: usize,
    },

    /// The trailing padding bits are not zero.
    #[error("Non-canonical token encoding")]
    NonCanonical,

    /// A service record carries the nil token.
    #[error("Service token cannot be nil")]
    Nil,
}

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration could not be loaded or failed validation.
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Config(_) => ErrorCode::INVALID_CONFIG,
            Self::Serialization(_) => ErrorCode::SERIALIZATION,
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
