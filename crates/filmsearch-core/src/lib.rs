//! # filmsearch-core: Pure Logic for Film Search
//!
//! This crate holds everything in the film search core that can be done
//! without I/O: the data model, request-parameter validation, offset
//! pagination and the SQL query builder.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Film Search Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (routes, HTML templates)              │   │
//! │  │    home ──► search_title ──► search_filter ──► genre ──► stats │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw request params                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ filmsearch-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │validation │  │   query   │  │  paging   │  │   types   │  │   │
//! │  │   │ page/year │  │FilmFilter │  │   Page    │  │   Film    │  │   │
//! │  │   │ text/genre│  │ predicates│  │ PAGE_SIZE │  │ YearRange │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ BuiltQuery (SQL + binds)               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  filmsearch-db (Database Layer)                 │   │
//! │  │        SQLite pool, film repository, search analytics          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Film, CategoryStat, YearRange, analytics records
//! - [`validation`] - Lenient request-parameter normalization
//! - [`paging`] - Offset pagination
//! - [`query`] - Parameterized SQL builder with shared predicates
//! - [`analytics`] - Query normalization and search labels
//! - [`error`] - Validation error types
//!
//! ## Example Usage
//!
//! ```rust
//! use filmsearch_core::paging::Page;
//! use filmsearch_core::query::{count_films, list_films_page, FilmFilter, FilmOrder};
//! use filmsearch_core::validation::{validate_genre, validate_year_range};
//!
//! let genre = validate_genre(Some(" Action "));
//! let (year_from, year_to) = validate_year_range(Some("2010"), Some("2001"));
//! let page = Page::from_param(Some("2"));
//!
//! let filter = FilmFilter::by_genre_year(genre.as_deref(), year_from, year_to);
//! let listing = list_films_page(&filter, FilmOrder::ReleaseYearDesc, page.offset());
//! let count = count_films(&filter);
//!
//! assert!(listing.sql.contains("f.release_year BETWEEN ? AND ?"));
//! assert!(count.sql.starts_with("SELECT COUNT(*)"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod error;
pub mod paging;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use paging::{Page, PAGE_SIZE};
pub use query::{BuiltQuery, FilmFilter, FilmOrder, SqlParam};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Earliest accepted release year, and the fallback lower year bound.
pub const DEFAULT_MIN_YEAR: i32 = 1900;

/// Latest accepted release year, and the fallback upper year bound.
pub const DEFAULT_MAX_YEAR: i32 = 2100;

/// Maximum length of a free-text search query, in characters.
pub const MAX_QUERY_CHARS: usize = 100;

/// Size of the popular/recent lists rendered on every page.
pub const DEFAULT_ANALYTICS_LIMIT: i64 = 5;

/// Upper bound for analytics list sizes requested through the JSON endpoint.
pub const MAX_ANALYTICS_LIMIT: i64 = 100;
