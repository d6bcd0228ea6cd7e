//! # Film Query Builder
//!
//! Builds parameterized SQL for film listings, counts and aggregates.
//! Pure string assembly: nothing here touches a database.
//!
//! ## Shared Predicates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Filter, Two Queries                              │
//! │                                                                         │
//! │  FilmFilter { category, year_from, year_to, title_substring }          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build_predicates(filter)  ← the ONLY place filters become SQL         │
//! │       │                                                                 │
//! │       ├──────────────────────────┐                                     │
//! │       ▼                          ▼                                     │
//! │  list_films(...)             count_films(...)                          │
//! │  SELECT cols ... WHERE p     SELECT COUNT(*) ... WHERE p               │
//! │  ORDER BY ... LIMIT ? OFFSET ?                                         │
//! │                                                                         │
//! │  A filter can never select rows for the listing that the count         │
//! │  does not see, because both embed the same predicate list.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Predicates
//! | filter                      | SQL                                          |
//! |-----------------------------|----------------------------------------------|
//! | category                    | `c.name = ?`                                 |
//! | year_from + year_to         | `f.release_year BETWEEN ? AND ?`             |
//! | year_from only              | `f.release_year >= ?`                        |
//! | year_to only                | `f.release_year <= ?`                        |
//! | title_substring             | `unicode_lower(f.title) LIKE ? ESCAPE '\'`   |
//!
//! Blank category and blank title count as absent.
//!
//! SQLite's own `LOWER` and `LIKE` fold ASCII only. Title matching goes
//! through [`UNICODE_LOWER_FN`], which the database layer registers on every
//! connection, and the bound pattern is lower-cased with the same Unicode
//! rules, so `Амели` matches `амели`.

use serde::{Deserialize, Serialize};

use crate::paging::PAGE_SIZE;

// =============================================================================
// SQL Fragments
// =============================================================================

const FILM_COLUMNS: &str = "f.title, f.release_year, f.rating, f.length, f.description, \
     c.name AS category";

const FILM_JOINS: &str = "FROM film f \
     JOIN film_category fc ON f.film_id = fc.film_id \
     JOIN category c ON fc.category_id = c.category_id";

const LIKE_ESCAPE: char = '\\';

/// Name of the Unicode-aware lowercase SQL function used for title matching.
///
/// Not a SQLite built-in: every connection that runs title queries must
/// have it registered.
pub const UNICODE_LOWER_FN: &str = "unicode_lower";

// =============================================================================
// Bind Parameters
// =============================================================================

/// A value bound to a `?` placeholder, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

/// SQL text plus its bind parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl BuiltQuery {
    fn unbound(sql: impl Into<String>) -> Self {
        BuiltQuery {
            sql: sql.into(),
            params: Vec::new(),
        }
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Optional film filters. Every present filter adds one predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmFilter {
    pub category: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub title_substring: Option<String>,
}

impl FilmFilter {
    /// No filters: the full catalog.
    pub fn all() -> Self {
        FilmFilter::default()
    }

    /// Case-insensitive title substring match.
    pub fn by_title(text: impl Into<String>) -> Self {
        FilmFilter {
            title_substring: Some(text.into()),
            ..FilmFilter::default()
        }
    }

    /// Category and/or release-year range.
    pub fn by_genre_year(genre: Option<&str>, year_from: Option<i32>, year_to: Option<i32>) -> Self {
        FilmFilter {
            category: genre.map(str::to_string),
            year_from,
            year_to,
            title_substring: None,
        }
    }

    /// Category name, if one that is not blank was given.
    pub fn effective_category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    /// Title substring, if one that is not blank was given.
    pub fn effective_title(&self) -> Option<&str> {
        non_blank(self.title_substring.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Ordering
// =============================================================================

/// Sort order of a film listing.
///
/// Both orders end with `f.film_id` so rows that tie on the sort key keep
/// catalog order and pages never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilmOrder {
    /// Newest first (home page, genre browsing).
    ReleaseYearDesc,
    /// Alphabetical (title search).
    TitleAsc,
}

impl FilmOrder {
    fn sql(self) -> &'static str {
        match self {
            FilmOrder::ReleaseYearDesc => "ORDER BY f.release_year DESC, f.film_id ASC",
            FilmOrder::TitleAsc => "ORDER BY f.title ASC, f.film_id ASC",
        }
    }
}

// =============================================================================
// Predicates
// =============================================================================

/// Conjunction of predicates derived from a [`FilmFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicates {
    clauses: Vec<&'static str>,
    params: Vec<SqlParam>,
}

impl Predicates {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[&'static str] {
        &self.clauses
    }

    /// ` WHERE a AND b`, or an empty string when there is nothing to filter.
    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    fn push(&mut self, clause: &'static str, params: impl IntoIterator<Item = SqlParam>) {
        self.clauses.push(clause);
        self.params.extend(params);
    }
}

/// Turns a filter into WHERE predicates and their bind values.
///
/// Shared by [`list_films`] and [`count_films`]; no other code may translate
/// filters into SQL.
pub fn build_predicates(filter: &FilmFilter) -> Predicates {
    let mut predicates = Predicates::default();

    if let Some(category) = filter.effective_category() {
        predicates.push("c.name = ?", [SqlParam::Text(category.to_string())]);
    }

    match (filter.year_from, filter.year_to) {
        (Some(from), Some(to)) => predicates.push(
            "f.release_year BETWEEN ? AND ?",
            [SqlParam::Int(from.into()), SqlParam::Int(to.into())],
        ),
        (Some(from), None) => {
            predicates.push("f.release_year >= ?", [SqlParam::Int(from.into())])
        }
        (None, Some(to)) => predicates.push("f.release_year <= ?", [SqlParam::Int(to.into())]),
        (None, None) => {}
    }

    if let Some(title) = filter.effective_title() {
        predicates.push(
            "unicode_lower(f.title) LIKE ? ESCAPE '\\'",
            [SqlParam::Text(like_pattern(&title.to_lowercase()))],
        );
    }

    predicates
}

/// Wraps a substring in `%` wildcards, escaping LIKE metacharacters so user
/// input only ever matches literally.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if ch == '%' || ch == '_' || ch == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Query Constructors
// =============================================================================

/// Paged film listing.
///
/// ## Example
/// ```rust
/// use filmsearch_core::query::{list_films, FilmFilter, FilmOrder, SqlParam};
///
/// let filter = FilmFilter::by_genre_year(Some("Action"), Some(2001), None);
/// let query = list_films(&filter, FilmOrder::ReleaseYearDesc, 10, 20);
///
/// assert!(query.sql.contains("WHERE c.name = ? AND f.release_year >= ?"));
/// assert_eq!(query.params.last(), Some(&SqlParam::Int(20)));
/// ```
pub fn list_films(filter: &FilmFilter, order: FilmOrder, limit: i64, offset: i64) -> BuiltQuery {
    let predicates = build_predicates(filter);

    let sql = format!(
        "SELECT {FILM_COLUMNS} {FILM_JOINS}{} {} LIMIT ? OFFSET ?",
        predicates.where_sql(),
        order.sql()
    );

    let mut params = predicates.params;
    params.push(SqlParam::Int(limit.max(0)));
    params.push(SqlParam::Int(offset.max(0)));

    BuiltQuery { sql, params }
}

/// One page ([`PAGE_SIZE`] rows) of a listing.
pub fn list_films_page(filter: &FilmFilter, order: FilmOrder, offset: i64) -> BuiltQuery {
    list_films(filter, order, i64::from(PAGE_SIZE), offset)
}

/// Number of rows the same filter selects, without ordering or paging.
pub fn count_films(filter: &FilmFilter) -> BuiltQuery {
    let predicates = build_predicates(filter);

    BuiltQuery {
        sql: format!("SELECT COUNT(*) {FILM_JOINS}{}", predicates.where_sql()),
        params: predicates.params,
    }
}

/// Per-category film count and release-year bounds, largest first.
pub fn category_stats() -> BuiltQuery {
    BuiltQuery::unbound(format!(
        "SELECT c.name AS name, COUNT(*) AS film_count, \
         MIN(f.release_year) AS min_year, MAX(f.release_year) AS max_year \
         {FILM_JOINS} \
         GROUP BY c.name \
         ORDER BY film_count DESC, c.name ASC"
    ))
}

/// Global release-year bounds over every film.
pub fn year_bounds() -> BuiltQuery {
    BuiltQuery::unbound(
        "SELECT MIN(release_year) AS min_year, MAX(release_year) AS max_year FROM film",
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn where_part(sql: &str) -> &str {
        let start = sql.find(" WHERE ").map(|i| i + 1).unwrap_or(sql.len());
        let end = sql.find(" ORDER BY").unwrap_or(sql.len());
        &sql[start.min(end)..end]
    }

    #[test]
    fn test_no_filters_yields_unfiltered_listing() {
        let query = list_films_page(&FilmFilter::all(), FilmOrder::ReleaseYearDesc, 0);

        assert!(!query.sql.contains("WHERE"));
        assert!(query.sql.contains("ORDER BY f.release_year DESC"));
        assert!(query.sql.ends_with("LIMIT ? OFFSET ?"));
        assert_eq!(query.params, vec![SqlParam::Int(10), SqlParam::Int(0)]);
    }

    #[test]
    fn test_category_predicate() {
        let filter = FilmFilter::by_genre_year(Some(" Action "), None, None);
        let predicates = build_predicates(&filter);

        assert_eq!(predicates.clauses(), &["c.name = ?"]);
        assert_eq!(predicates.params, vec![SqlParam::Text("Action".to_string())]);
    }

    #[test]
    fn test_blank_category_is_no_filter() {
        for genre in [None, Some(""), Some("   ")] {
            let filter = FilmFilter::by_genre_year(genre, None, None);
            assert!(build_predicates(&filter).is_empty(), "genre {genre:?}");
        }
    }

    #[test]
    fn test_year_predicates() {
        let both = build_predicates(&FilmFilter::by_genre_year(None, Some(2001), Some(2010)));
        assert_eq!(both.clauses(), &["f.release_year BETWEEN ? AND ?"]);
        assert_eq!(both.params, vec![SqlParam::Int(2001), SqlParam::Int(2010)]);

        let from = build_predicates(&FilmFilter::by_genre_year(None, Some(2001), None));
        assert_eq!(from.clauses(), &["f.release_year >= ?"]);

        let to = build_predicates(&FilmFilter::by_genre_year(None, None, Some(2010)));
        assert_eq!(to.clauses(), &["f.release_year <= ?"]);
        assert_eq!(to.params, vec![SqlParam::Int(2010)]);
    }

    #[test]
    fn test_combined_predicates_keep_param_order() {
        let filter = FilmFilter {
            category: Some("Drama".to_string()),
            year_from: Some(1990),
            year_to: Some(2000),
            title_substring: Some("love".to_string()),
        };
        let predicates = build_predicates(&filter);

        assert_eq!(
            predicates.where_sql(),
            " WHERE c.name = ? AND f.release_year BETWEEN ? AND ? \
             AND unicode_lower(f.title) LIKE ? ESCAPE '\\'"
        );
        assert_eq!(
            predicates.params,
            vec![
                SqlParam::Text("Drama".to_string()),
                SqlParam::Int(1990),
                SqlParam::Int(2000),
                SqlParam::Text("%love%".to_string()),
            ]
        );
    }

    #[test]
    fn test_title_pattern_is_wrapped_and_escaped() {
        assert_eq!(like_pattern("matrix"), "%matrix%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");

        let filter = FilmFilter::by_title("  Matrix ");
        let predicates = build_predicates(&filter);
        assert_eq!(predicates.params, vec![SqlParam::Text("%matrix%".to_string())]);
    }

    #[test]
    fn test_title_pattern_folds_non_ascii_case() {
        let predicates = build_predicates(&FilmFilter::by_title("АМЕЛИ"));
        assert_eq!(predicates.params, vec![SqlParam::Text("%амели%".to_string())]);

        let predicates = build_predicates(&FilmFilter::by_title("Ärger"));
        assert_eq!(predicates.params, vec![SqlParam::Text("%ärger%".to_string())]);
        assert!(predicates.clauses()[0].starts_with(UNICODE_LOWER_FN));
    }

    #[test]
    fn test_title_search_orders_by_title() {
        let query = list_films(&FilmFilter::by_title("alien"), FilmOrder::TitleAsc, 10, 30);

        assert!(query.sql.contains("ORDER BY f.title ASC"));
        assert_eq!(query.params.len(), 3);
        assert_eq!(query.params[2], SqlParam::Int(30));
    }

    #[test]
    fn test_count_shares_where_clause_with_listing() {
        let filters = [
            FilmFilter::all(),
            FilmFilter::by_title("the"),
            FilmFilter::by_genre_year(Some("Action"), None, None),
            FilmFilter::by_genre_year(Some("Action"), Some(2001), Some(2010)),
            FilmFilter::by_genre_year(None, None, Some(1999)),
        ];

        for filter in &filters {
            let list = list_films_page(filter, FilmOrder::ReleaseYearDesc, 40);
            let count = count_films(filter);

            assert_eq!(where_part(&list.sql), where_part(&count.sql), "{filter:?}");
            // Listing binds exactly the count's params, then LIMIT and OFFSET
            assert_eq!(&list.params[..count.params.len()], &count.params[..]);
            assert_eq!(list.params.len(), count.params.len() + 2);

            assert!(count.sql.starts_with("SELECT COUNT(*)"));
            assert!(!count.sql.contains("ORDER BY"));
            assert!(!count.sql.contains("LIMIT"));
            assert!(!count.sql.contains("OFFSET"));
        }
    }

    #[test]
    fn test_negative_paging_values_are_clamped() {
        let query = list_films(&FilmFilter::all(), FilmOrder::ReleaseYearDesc, -5, -10);
        assert_eq!(query.params, vec![SqlParam::Int(0), SqlParam::Int(0)]);
    }

    #[test]
    fn test_aggregate_queries() {
        let stats = category_stats();
        assert!(stats.sql.contains("GROUP BY c.name"));
        assert!(stats.sql.contains("ORDER BY film_count DESC"));
        assert!(stats.params.is_empty());

        let bounds = year_bounds();
        assert!(bounds.sql.contains("MIN(release_year)"));
        assert!(bounds.sql.contains("MAX(release_year)"));
    }
}
