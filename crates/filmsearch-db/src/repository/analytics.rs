//! # Search Analytics Repository
//!
//! Persistent counters of what users search for.
//!
//! ## Upsert
//! ```text
//! record_query("  Matrix ")
//!       │
//!       ▼  normalize: trim + lowercase  ("matrix")
//!       │
//!       ▼  INSERT ... ON CONFLICT(query) DO UPDATE SET count = count + 1
//!       │
//!  search_queries
//!  ┌──────────┬───────┬──────────────────────────────┐
//!  │ query    │ count │ last_searched                │
//!  ├──────────┼───────┼──────────────────────────────┤
//!  │ matrix   │   2   │ 2026-10-16T09:41:07.120355Z  │
//!  └──────────┴───────┴──────────────────────────────┘
//! ```
//!
//! The increment happens inside the store in one statement, so concurrent
//! requests recording the same text never lose a count.

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use filmsearch_core::analytics::{clamp_analytics_limit, normalize_query};
use filmsearch_core::{AnalyticsSnapshot, PopularQuery, SearchQueryRecord, DEFAULT_ANALYTICS_LIMIT};

use super::degrade;
use crate::error::DbResult;
use crate::pool::Database;

const UPSERT_SQL: &str = r#"
    INSERT INTO search_queries (query, count, last_searched)
    VALUES (?1, 1, ?2)
    ON CONFLICT(query) DO UPDATE SET
        count = count + 1,
        last_searched = excluded.last_searched
"#;

/// Repository for the search analytics store.
#[derive(Debug, Clone)]
pub struct SearchAnalyticsRepository {
    db: Database,
}

impl SearchAnalyticsRepository {
    /// Creates a new SearchAnalyticsRepository.
    pub fn new(db: Database) -> Self {
        SearchAnalyticsRepository { db }
    }

    /// Counts one use of `text` and stamps it as the latest search.
    ///
    /// Blank text is ignored. Texts differing only in case or surrounding
    /// whitespace share one record.
    pub async fn record_query(&self, text: &str) -> DbResult<()> {
        let Some(query) = normalize_query(text) else {
            return Ok(());
        };

        debug!(query = %query, "Recording search query");

        // Fixed-width UTC text keeps `ORDER BY last_searched` chronological
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let result = self
            .db
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query(UPSERT_SQL)
                        .bind(query)
                        .bind(now)
                        .execute(conn)
                        .await
                        .map(|_| ())
                })
            })
            .await;

        degrade(self.db.observer(), "record_query", result)
    }

    /// Most used queries, by count descending.
    ///
    /// The order among equal counts is whatever the store returns.
    pub async fn top_queries(&self, limit: i64) -> DbResult<Vec<PopularQuery>> {
        // SQLite reads a negative LIMIT as "no limit"
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let result = self
            .db
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query_as::<_, PopularQuery>(
                        "SELECT query, count FROM search_queries ORDER BY count DESC LIMIT ?1",
                    )
                    .bind(limit)
                    .fetch_all(conn)
                    .await
                })
            })
            .await;

        degrade(self.db.observer(), "top_queries", result)
    }

    /// Most recently searched query texts, newest first.
    pub async fn recent_queries(&self, limit: i64) -> DbResult<Vec<String>> {
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let result = self
            .db
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query_as::<_, (String,)>(
                        "SELECT query FROM search_queries ORDER BY last_searched DESC LIMIT ?1",
                    )
                    .bind(limit)
                    .fetch_all(conn)
                    .await
                })
            })
            .await
            .map(|rows| rows.into_iter().map(|(query,)| query).collect());

        degrade(self.db.observer(), "recent_queries", result)
    }

    /// Looks up the record for `text`, after normalization.
    pub async fn find(&self, text: &str) -> DbResult<Option<SearchQueryRecord>> {
        let Some(query) = normalize_query(text) else {
            return Ok(None);
        };

        let result = self
            .db
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query_as::<_, SearchQueryRecord>(
                        "SELECT query, count, last_searched FROM search_queries WHERE query = ?1",
                    )
                    .bind(query)
                    .fetch_optional(conn)
                    .await
                })
            })
            .await;

        degrade(self.db.observer(), "find_query", result)
    }

    /// Trends and recent history for the analytics endpoint.
    ///
    /// `limit` sizes the trends list and is clamped to `[1, 100]`; the
    /// recent list always holds up to 5 entries.
    pub async fn snapshot(&self, limit: Option<i64>) -> DbResult<AnalyticsSnapshot> {
        let trends = self.top_queries(clamp_analytics_limit(limit)).await?;
        let recent = self.recent_queries(DEFAULT_ANALYTICS_LIMIT).await?;

        Ok(AnalyticsSnapshot { trends, recent })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
