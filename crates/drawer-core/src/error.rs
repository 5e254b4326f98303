//! # Error Types
//!
//! Domain-specific error types for drawer-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  drawer-core errors (this file)                                        │
//! │  ├── CoreError        - Rejected operations                            │
//! │  └── ValidationError  - Input parsing failures                         │
//! │                                                                         │
//! │  drawer-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  drawer-sync errors (separate crate)                                   │
//! │  └── SyncError        - Persistence / config failures                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → terminal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is fatal. A rejected write leaves the prior value in place,
//! and an unreachable removal target is a planner status rather than an error.

use thiserror::Error;

use crate::tier::Tier;

// =============================================================================
// Core Error
// =============================================================================

/// Rejected drawer operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input failed validation; the previous value is kept.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Requested drawer lies beyond what the tier allows.
    ///
    /// ## User Workflow
    /// ```text
    /// Guest on Drawer 1 presses "next"
    ///      │
    ///      ▼
    /// select_drawer(2) with capacity 1
    ///      │
    ///      ▼
    /// CapacityExceeded { requested: 2, capacity: 1, tier: Guest }
    ///      │
    ///      ▼
    /// UI shows the sign-up prompt
    /// ```
    #[error("Drawer {requested} is not available on the {tier} tier (limit {capacity})")]
    CapacityExceeded {
        requested: usize,
        capacity: usize,
        tier: Tier,
    },

    /// The denomination id is not in the catalog.
    #[error("Unknown denomination: {0}")]
    UnknownDenomination(String),

    /// A roll value was set on a kind that is not a roll.
    #[error("{0} is not a roll denomination")]
    NotARoll(String),

    /// The catalog definition itself is inconsistent.
    #[error("Invalid catalog: {reason}")]
    InvalidCatalog { reason: String },

    /// The feature needs a signed-in account.
    #[error("{feature} requires an account")]
    RequiresAccount { feature: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while parsing what the user typed, before any drawer is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be a whole number.
    #[error("{field} must be a whole number")]
    NotAnInteger { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., letters in an amount, too many decimals).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let err = CoreError::CapacityExceeded {
            requested: 4,
            capacity: 3,
            tier: Tier::User,
        };
        assert_eq!(
            err.to_string(),
            "Drawer 4 is not available on the user tier (limit 3)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Negative {
            field: "quarter".to_string(),
        };
        assert_eq!(err.to_string(), "quarter must not be negative");

        let err = ValidationError::NotAnInteger {
            field: "dime".to_string(),
        };
        assert_eq!(err.to_string(), "dime must be a whole number");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "target".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::InvalidInput(_)));
    }
}
