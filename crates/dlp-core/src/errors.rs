//! # Core Error Types
//!
//! Pure math raises on true domain violations; estimators with a sensible
//! default never reach these.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Mathematically undefined input, e.g. the logarithm of a non-positive price
    #[error("Domain error in {operation}: {reason}")]
    Domain {
        operation: &'static str,
        reason: String,
    },

    /// Precondition violation on an argument
    #[error("Invalid argument {name}={value}: expected {expected}")]
    InvalidArgument {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Entity or patch rejected at the store boundary
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn domain(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Domain {
            operation,
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(
        name: &'static str,
        value: impl ToString,
        expected: &'static str,
    ) -> Self {
        Self::InvalidArgument {
            name,
            value: value.to_string(),
            expected,
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
