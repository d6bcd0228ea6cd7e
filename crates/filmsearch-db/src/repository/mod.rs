//! # Repository Module
//!
//! Read-only film catalog access and the search analytics store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Call Anatomy                              │
//! │                                                                         │
//! │  Presentation layer                                                    │
//! │       │  db.films().search_by_genre_year(Some("Action"), .., 0)        │
//! │       ▼                                                                 │
//! │  FilmRepository                                                        │
//! │  ├── 1. filmsearch_core::query builds SQL + binds                      │
//! │  ├── 2. Database::with_connection acquires one connection              │
//! │  ├── 3. bind_params + fetch                                            │
//! │  └── 4. degrade(): query error → observer → empty result               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Only connection failures come back as Err.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`FilmRepository`](film::FilmRepository) - listings, counts, aggregates
//! - [`SearchAnalyticsRepository`](analytics::SearchAnalyticsRepository) - query counters

pub mod analytics;
pub mod film;

use sqlx::query::QueryAs;
use sqlx::Sqlite;

use filmsearch_core::SqlParam;

use crate::error::DbResult;
use crate::observer::FailureObserver;

type SqliteQueryAs<'q, O> = QueryAs<'q, Sqlite, O, <Sqlite as sqlx::Database>::Arguments<'q>>;

/// Binds builder parameters to their placeholders, in order.
pub(crate) fn bind_params<'q, O>(
    mut query: SqliteQueryAs<'q, O>,
    params: &'q [SqlParam],
) -> SqliteQueryAs<'q, O> {
    for param in params {
        query = match param {
            SqlParam::Text(text) => query.bind(text.as_str()),
            SqlParam::Int(value) => query.bind(*value),
        };
    }
    query
}

/// Applies the degrade-to-empty policy to a repository result.
///
/// Connection failures pass through. Any other error is reported to the
/// observer and replaced by `T::default()`.
pub(crate) fn degrade<T: Default>(
    observer: &dyn FailureObserver,
    operation: &'static str,
    result: DbResult<T>,
) -> DbResult<T> {
    match result {
        Err(err) if !err.is_connection_failure() => {
            observer.degraded(operation, &err);
            Ok(T::default())
        }
        other => other,
    }
}
