//! # Error Types
//!
//! Domain-specific error types for filmsearch-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  filmsearch-core errors (this file)                                    │
//! │  └── ValidationError  - Strict parse failures (page, year)             │
//! │                                                                         │
//! │  filmsearch-db errors (separate crate)                                 │
//! │  ├── DbError          - Connection / query failures                    │
//! │  └── ConfigError      - Bad environment configuration                  │
//! │                                                                         │
//! │  The lenient validators (`validate_page`, `validate_year`, ...) never  │
//! │  surface these: they fall back to a safe default instead.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Returned by the strict constructors (`Page::new`, `parse_year`). Request
/// handling normally goes through the lenient validators, which map these to
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric year).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
