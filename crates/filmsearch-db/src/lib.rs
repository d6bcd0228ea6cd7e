//! # filmsearch-db: Database Layer for Film Search
//!
//! This crate provides database access for the film search site: the
//! read-only film catalog and the search analytics store. It uses SQLite
//! with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Film Search Data Flow                            │
//! │                                                                         │
//! │  Request handler (home page, /search, /genre, /analytics)             │
//! │       │  validated inputs (filmsearch_core::validation)                │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   filmsearch-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │   │   │
//! │  │   │               │    │ FilmRepository │   │ 001_catalog  │   │   │
//! │  │   │ SqlitePool    │◄───│ SearchAnalytics│   │ 002_search   │   │   │
//! │  │   │ with_connection    │ Repository     │   │              │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  │          │                     │                                │   │
//! │  │          │              FailureObserver (degraded reads)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   film / category / film_category / search_queries             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Configuration, connection pool, scoped connections
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and configuration error types
//! - [`observer`] - Where degraded query failures are reported
//! - [`repository`] - Film catalog and search analytics repositories
//! - [`overview`] - Sidebar data shared by every page
//! - [`loader`] - Catalog inserts for seeding
//!
//! ## Usage
//!
//! ```rust,ignore
//! use filmsearch_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let films = db.films().search_by_title("matrix", 0, 10).await?;
//! let total = db.films().count_by_title("matrix").await?;
//! db.analytics().record_query("matrix").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
mod functions;
pub mod loader;
pub mod migrations;
pub mod observer;
pub mod overview;
pub mod pool;
pub mod repository;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, DbError, DbResult};
pub use observer::{FailureObserver, TracingObserver};
pub use overview::catalog_overview;
pub use pool::{ConnFuture, Database, DbConfig};

// Repository re-exports for convenience
pub use repository::analytics::SearchAnalyticsRepository;
pub use repository::film::FilmRepository;
