//! # Film Repository
//!
//! Read-only access to the film catalog.
//!
//! ## Key Operations
//! - Newest-first listing (home page)
//! - Title substring search with count
//! - Genre / release-year filtering with count
//! - Category statistics and global year bounds
//!
//! ## Degrade-to-Empty
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Failure Handling Per Call                            │
//! │                                                                         │
//! │  acquire connection ──✗──► Err(ConnectionFailed)   (propagated)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  run query ──✗──► observer.degraded(op, err) ──► Ok(empty / default)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(rows)                                                              │
//! │                                                                         │
//! │  A page rendered from these results never crashes on a bad query,      │
//! │  but "no films" and "query failed" look the same to the caller.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqliteConnection;
use tracing::debug;

use filmsearch_core::query::{self, BuiltQuery, FilmFilter, FilmOrder};
use filmsearch_core::{CategoryStat, Film, YearRange, PAGE_SIZE};

use super::{bind_params, degrade};
use crate::error::DbResult;
use crate::pool::Database;

/// Repository for film catalog reads.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.films();
///
/// let page = repo.search_by_title("alien", 0, 10).await?;
/// let total = repo.count_by_title("alien").await?;
/// ```
#[derive(Debug, Clone)]
pub struct FilmRepository {
    db: Database,
}

impl FilmRepository {
    /// Creates a new FilmRepository.
    pub fn new(db: Database) -> Self {
        FilmRepository { db }
    }

    /// Newest films first, one page starting at `offset`.
    pub async fn list_new_releases(&self, offset: i64) -> DbResult<Vec<Film>> {
        debug!(offset, "Listing new releases");

        let built = query::list_films_page(&FilmFilter::all(), FilmOrder::ReleaseYearDesc, offset);
        self.fetch_films("list_new_releases", built).await
    }

    /// Films whose title contains `text` (case-insensitive), alphabetically.
    ///
    /// Blank `text` returns an empty list without touching the database.
    pub async fn search_by_title(&self, text: &str, offset: i64, limit: i64) -> DbResult<Vec<Film>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        debug!(query = %text, offset, limit, "Searching films by title");

        let built = query::list_films(&FilmFilter::by_title(text), FilmOrder::TitleAsc, limit, offset);
        self.fetch_films("search_by_title", built).await
    }

    /// Number of films matched by [`search_by_title`](Self::search_by_title).
    ///
    /// Blank `text` returns 0 without touching the database.
    pub async fn count_by_title(&self, text: &str) -> DbResult<i64> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(0);
        }

        self.fetch_count("count_by_title", query::count_films(&FilmFilter::by_title(text)))
            .await
    }

    /// Films filtered by category and/or release-year range, newest first.
    ///
    /// A blank or absent `genre` means "any category".
    pub async fn search_by_genre_year(
        &self,
        genre: Option<&str>,
        year_from: Option<i32>,
        year_to: Option<i32>,
        offset: i64,
    ) -> DbResult<Vec<Film>> {
        debug!(?genre, ?year_from, ?year_to, offset, "Searching films by genre/year");

        let filter = FilmFilter::by_genre_year(genre, year_from, year_to);
        let built = query::list_films(
            &filter,
            FilmOrder::ReleaseYearDesc,
            i64::from(PAGE_SIZE),
            offset,
        );
        self.fetch_films("search_by_genre_year", built).await
    }

    /// Number of films matched by [`search_by_genre_year`](Self::search_by_genre_year).
    pub async fn count_by_genre_year(
        &self,
        genre: Option<&str>,
        year_from: Option<i32>,
        year_to: Option<i32>,
    ) -> DbResult<i64> {
        let filter = FilmFilter::by_genre_year(genre, year_from, year_to);
        self.fetch_count("count_by_genre_year", query::count_films(&filter))
            .await
    }

    /// Listing for an arbitrary filter with an explicit limit.
    ///
    /// The general form behind the operations above.
    pub async fn list(
        &self,
        filter: &FilmFilter,
        order: FilmOrder,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Film>> {
        self.fetch_films("list", query::list_films(filter, order, limit, offset))
            .await
    }

    /// Count for an arbitrary filter.
    pub async fn count(&self, filter: &FilmFilter) -> DbResult<i64> {
        self.fetch_count("count", query::count_films(filter)).await
    }

    /// Film count and year span per category, largest category first.
    pub async fn category_stats(&self) -> DbResult<Vec<CategoryStat>> {
        let built = query::category_stats();

        let result = self
            .db
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query_as::<_, CategoryStat>(&built.sql)
                        .fetch_all(conn)
                        .await
                })
            })
            .await;

        degrade(self.db.observer(), "category_stats", result)
    }

    /// Earliest and latest release year in the catalog.
    ///
    /// `(1900, 2100)` when the catalog is empty or the query fails; each
    /// bound falls back on its own when its aggregate is NULL.
    pub async fn year_bounds(&self) -> DbResult<YearRange> {
        let built = query::year_bounds();

        let result = self
            .db
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query_as::<_, (Option<i32>, Option<i32>)>(&built.sql)
                        .fetch_one(conn)
                        .await
                })
            })
            .await
            .map(|(min_year, max_year)| YearRange::from_bounds(min_year, max_year));

        degrade(self.db.observer(), "year_bounds", result)
    }

    // -------------------------------------------------------------------------
    // Execution helpers
    // -------------------------------------------------------------------------

    async fn fetch_films(&self, operation: &'static str, built: BuiltQuery) -> DbResult<Vec<Film>> {
        let result = self
            .db
            .with_connection(move |conn| Box::pin(async move { run_films(conn, &built).await }))
            .await;

        let films = degrade(self.db.observer(), operation, result)?;
        debug!(operation, count = films.len(), "Film query returned rows");
        Ok(films)
    }

    async fn fetch_count(&self, operation: &'static str, built: BuiltQuery) -> DbResult<i64> {
        let result = self
            .db
            .with_connection(move |conn| Box::pin(async move { run_count(conn, &built).await }))
            .await;

        degrade(self.db.observer(), operation, result)
    }
}

async fn run_films(conn: &mut SqliteConnection, built: &BuiltQuery) -> Result<Vec<Film>, sqlx::Error> {
    bind_params(sqlx::query_as::<_, Film>(&built.sql), &built.params)
        .fetch_all(conn)
        .await
}

async fn run_count(conn: &mut SqliteConnection, built: &BuiltQuery) -> Result<i64, sqlx::Error> {
    let (count,) = bind_params(sqlx::query_as::<_, (i64,)>(&built.sql), &built.params)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

// =============================================================================
// Unit Tests
// =============================================================================
