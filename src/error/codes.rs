//! Error code constants.
//!
//! Error codes are organized by category:
//! - 1xxx: Configuration errors
//! - 2xxx: Serialization errors

/// Error code type with semantic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(i32);

impl ErrorCode {
    // ===== Configuration Errors (1xxx) =====

    /// Configuration could not be loaded or is invalid.
    pub const INVALID_CONFIG: Self = Self(1001);

    // ===== Serialization Errors (2xxx) =====

    /// JSON encoding or decoding failed.
    pub const SERIALIZATION: Self = Self(2001);

    /// Get the error code as an i32.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Get the category of this error code.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self.0 {
            1000..=1999 => ErrorCategory::Configuration,
            2000..=2999 => ErrorCategory::Serialization,
            _ => ErrorCategory::Unknown,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

/// Error category based on error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration errors (1xxx).
    Configuration,
    /// Serialization errors (2xxx).
    Serialization,
    /// Unknown category.
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Serialization => write!(f, "serialization"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::INVALID_CONFIG.as_i32(), 1001);
        assert_eq!(i32::from(ErrorCode::SERIALIZATION), 2001);
        assert_eq!(ErrorCode::SERIALIZATION.to_string(), "2001");
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ErrorCode::INVALID_CONFIG.category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            ErrorCode::SERIALIZATION.category(),
            ErrorCategory::Serialization
        );
        assert_eq!(ErrorCode(42).category(), ErrorCategory::Unknown);
        assert_eq!(ErrorCategory::Configuration.to_string(), "configuration");
    }
}
