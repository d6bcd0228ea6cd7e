//! # Validation Module
//!
//! Normalization of raw request parameters before they reach the repository.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (routes, forms)                                 │
//! │  └── Hands over raw strings, possibly missing                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Lenient: validate_page, validate_year, ... never fail,            │
//! │  │   invalid input becomes a safe default                              │
//! │  └── Strict: parse_year returns a typed ValidationError                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Query builder                                                │
//! │  └── Receives typed Option<i32>/Option<String> filters only            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use filmsearch_core::validation::{validate_page, validate_year};
//!
//! assert_eq!(validate_page(Some("abc")), 1);
//! assert_eq!(validate_year(Some("1999")), Some(1999));
//! assert_eq!(validate_year(Some("1800")), None);
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::{DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR, MAX_QUERY_CHARS};

// =============================================================================
// Page
// =============================================================================

/// Parses a page number.
///
/// ## Rules
/// - Missing or non-numeric → 1
/// - Values below 1 are clamped to 1
/// - No upper bound (values past `u32::MAX` saturate)
pub fn validate_page(page: Option<&str>) -> u32 {
    let parsed = page.and_then(|raw| raw.trim().parse::<i64>().ok());

    match parsed {
        Some(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => 1,
    }
}

// =============================================================================
// Years
// =============================================================================

/// Strictly parses a release year in `[1900, 2100]`.
///
/// ## Example
/// ```rust
/// use filmsearch_core::validation::parse_year;
///
/// assert_eq!(parse_year("2006"), Ok(2006));
/// assert!(parse_year("20o6").is_err());
/// assert!(parse_year("2200").is_err());
/// ```
pub fn parse_year(raw: &str) -> ValidationResult<i32> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "year".to_string(),
        });
    }

    let year: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "year".to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    if !(i64::from(DEFAULT_MIN_YEAR)..=i64::from(DEFAULT_MAX_YEAR)).contains(&year) {
        return Err(ValidationError::OutOfRange {
            field: "year".to_string(),
            min: DEFAULT_MIN_YEAR.into(),
            max: DEFAULT_MAX_YEAR.into(),
        });
    }

    // in range, so it fits
    Ok(year as i32)
}

/// Lenient year validation: the year if it parses and lies in
/// `[1900, 2100]`, otherwise `None`.
pub fn validate_year(year: Option<&str>) -> Option<i32> {
    year.and_then(|raw| parse_year(raw).ok())
}

/// Validates both bounds of a year filter and swaps them when reversed.
///
/// A bound that fails validation becomes `None`; the other one is kept.
pub fn validate_year_range(
    year_from: Option<&str>,
    year_to: Option<&str>,
) -> (Option<i32>, Option<i32>) {
    match (validate_year(year_from), validate_year(year_to)) {
        (Some(from), Some(to)) if from > to => (Some(to), Some(from)),
        bounds => bounds,
    }
}

// =============================================================================
// Free Text
// =============================================================================

/// Trims a free-text search query and truncates it to 100 characters.
///
/// Truncation counts characters, not bytes, so multi-byte titles are never
/// split inside a code point. Empty input yields an empty string; the caller
/// decides whether that means "no search".
pub fn validate_query_text(text: &str) -> String {
    text.trim().chars().take(MAX_QUERY_CHARS).collect()
}

/// Normalizes a genre name.
///
/// ## Rules
/// - `None` stays `None` (filter absent)
/// - Whitespace-only becomes `Some("")` (filter present but empty)
/// - Anything else is trimmed
///
/// The query builder treats `Some("")` and `None` the same way (no category
/// predicate); the distinction only survives for callers that echo the
/// submitted form back.
pub fn validate_genre(name: Option<&str>) -> Option<String> {
    name.map(|genre| genre.trim().to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
