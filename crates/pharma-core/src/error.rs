//! # Error Types
//!
//! Domain-specific error types for pharma-core.
//!
//! ## Error Hierarchy
//! ```text
//! pharma-core errors (this file)
//! ├── CoreError        - General domain errors
//! └── ValidationError  - Input validation failures
//!
//! pharma-db errors (separate crate)
//! └── DbError          - Database operation failures
//!
//! apps/api errors
//! └── ApiError         - What HTTP clients see (serialized)
//!
//! Flow: ValidationError → CoreError → DbError → ApiError → client
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations; they are caught at the API
/// boundary and translated to user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cash tendered does not cover the sale total.
    ///
    /// Only raised when the underpayment-rejection policy is enabled.
    /// The default behavior records the sale with a negative change amount.
    #[error("Amount tendered {tendered_cents} does not cover total {total_cents}")]
    Underpayment {
        total_cents: i64,
        tendered_cents: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any side effect runs, so a rejected request leaves no
/// trace in the database.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// The cart contains no line items.
    #[error("cart must contain at least one item")]
    EmptyCart,

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., bad date, unknown enum value).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::Underpayment {
            total_cents: 1500,
            tendered_cents: 1000,
        };
        assert_eq!(
            err.to_string(),
            "Amount tendered 1000 does not cover total 1500"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "username".to_string(),
        };
        assert_eq!(err.to_string(), "username is required");

        assert_eq!(
            ValidationError::EmptyCart.to_string(),
            "cart must contain at least one item"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let err: CoreError = ValidationError::EmptyCart.into();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
