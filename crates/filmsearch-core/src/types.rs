//! # Domain Types
//!
//! Core data types shared by the repository, the analytics store and the
//! presentation layer.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Film       │   │  CategoryStat   │   │   YearRange     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  title          │   │  name           │   │  min_year       │       │
//! │  │  release_year   │   │  film_count     │   │  max_year       │       │
//! │  │  rating         │   │  min_year       │   │  (1900, 2100)   │       │
//! │  │  length         │   │  max_year       │   │  by default     │       │
//! │  │  description    │   └─────────────────┘   └─────────────────┘       │
//! │  │  category       │                                                    │
//! │  └─────────────────┘   ┌─────────────────┐   ┌─────────────────┐       │
//! │                        │SearchQueryRecord│   │  PopularQuery   │       │
//! │                        │  query (key)    │   │  query          │       │
//! │                        │  count          │   │  count          │       │
//! │                        │  last_searched  │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Films carry no identifier: the catalog's primary keys never leave the
//! database crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR};

// =============================================================================
// Film
// =============================================================================

/// A catalog entry as projected by every listing query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Film {
    pub title: String,

    /// Nullable in the catalog; NULL years sort last in year-descending lists.
    pub release_year: Option<i32>,

    /// Rating code such as `PG-13`.
    pub rating: Option<String>,

    /// Running time in minutes.
    pub length: Option<i32>,

    pub description: Option<String>,

    /// Name of the category the film is filed under.
    pub category: String,
}

// =============================================================================
// Category Stat
// =============================================================================

/// Per-category aggregate, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CategoryStat {
    /// Category name (unique per row).
    pub name: String,

    /// Number of films filed under the category.
    pub film_count: i64,

    /// Earliest release year in the category, if any film has one.
    pub min_year: Option<i32>,

    /// Latest release year in the category, if any film has one.
    pub max_year: Option<i32>,
}

// =============================================================================
// Year Range
// =============================================================================

/// Global release-year bounds of the catalog.
///
/// Falls back to `(1900, 2100)` when the catalog is empty or unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min_year: i32,
    pub max_year: i32,
}

impl YearRange {
    pub const fn new(min_year: i32, max_year: i32) -> Self {
        YearRange { min_year, max_year }
    }

    /// Builds a range from raw aggregates, defaulting each missing bound
    /// independently.
    pub fn from_bounds(min_year: Option<i32>, max_year: Option<i32>) -> Self {
        YearRange {
            min_year: min_year.unwrap_or(DEFAULT_MIN_YEAR),
            max_year: max_year.unwrap_or(DEFAULT_MAX_YEAR),
        }
    }

    /// Returns the range as a `(min, max)` tuple.
    pub const fn as_tuple(&self) -> (i32, i32) {
        (self.min_year, self.max_year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        YearRange::new(DEFAULT_MIN_YEAR, DEFAULT_MAX_YEAR)
    }
}

// =============================================================================
// Search Analytics
// =============================================================================

/// A stored search query with its usage counter.
///
/// `query` is the normalized text (trimmed, lower-cased) and is the sole
/// identity key of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SearchQueryRecord {
    pub query: String,
    pub count: i64,
    pub last_searched: DateTime<Utc>,
}

/// Entry of the "popular searches" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PopularQuery {
    pub query: String,
    pub count: i64,
}

impl From<SearchQueryRecord> for PopularQuery {
    fn from(record: SearchQueryRecord) -> Self {
        PopularQuery {
            query: record.query,
            count: record.count,
        }
    }
}

/// Payload of the analytics JSON endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    /// Most used queries, by count descending.
    pub trends: Vec<PopularQuery>,

    /// Most recently used query texts.
    pub recent: Vec<String>,
}

// =============================================================================
// Catalog Overview
// =============================================================================

/// Data every page renders next to its main content: the genre sidebar,
/// the year-range pickers and the search history widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOverview {
    pub categories: Vec<CategoryStat>,
    pub popular: Vec<PopularQuery>,
    pub recent: Vec<String>,
    pub years: YearRange,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_defaults() {
        assert_eq!(YearRange::default().as_tuple(), (1900, 2100));
        assert_eq!(YearRange::from_bounds(None, None).as_tuple(), (1900, 2100));
        assert_eq!(
            YearRange::from_bounds(Some(1985), None).as_tuple(),
            (1985, 2100)
        );
        assert_eq!(
            YearRange::from_bounds(Some(1985), Some(2006)).as_tuple(),
            (1985, 2006)
        );
    }

    #[test]
    fn test_popular_query_from_record() {
        let record = SearchQueryRecord {
            query: "matrix".to_string(),
            count: 3,
            last_searched: Utc::now(),
        };
        let popular = PopularQuery::from(record);
        assert_eq!(popular.query, "matrix");
        assert_eq!(popular.count, 3);
    }

    #[test]
    fn test_analytics_snapshot_json_shape() {
        let snapshot = AnalyticsSnapshot {
            trends: vec![PopularQuery {
                query: "matrix".to_string(),
                count: 2,
            }],
            recent: vec!["inception".to_string()],
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["trends"][0]["query"], "matrix");
        assert_eq!(json["trends"][0]["count"], 2);
        assert_eq!(json["recent"][0], "inception");
    }
}
