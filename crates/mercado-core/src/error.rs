//! # Error Types
//!
//! Input validation errors for mercado-core.
//!
//! Storage and business-flow errors (insufficient stock, unexpected database
//! failures) live in mercado-db, where the transaction boundary is; this
//! module only covers what can be rejected before any I/O happens.

use thiserror::Error;

/// Input validation errors.
///
/// Detected before any storage access; a request that fails validation
/// never opens a transaction.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be a positive integer.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., invalid UUID, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The total declared by the client does not match the sum of the
    /// order's line items at current prices.
    #[error("declared total {declared_cents} does not match computed total {computed_cents}")]
    TotalMismatch {
        declared_cents: i64,
        computed_cents: i64,
    },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "document_ref".to_string(),
        };
        assert_eq!(err.to_string(), "document_ref is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_total_mismatch_message() {
        let err = ValidationError::TotalMismatch {
            declared_cents: 40000,
            computed_cents: 40100,
        };
        assert_eq!(
            err.to_string(),
            "declared total 40000 does not match computed total 40100"
        );
    }
}
