//! # Search Analytics Helpers
//!
//! Pure helpers around the search analytics store: query normalization,
//! the labels recorded for filter searches, and limit clamping for the
//! JSON endpoint.

use crate::{DEFAULT_ANALYTICS_LIMIT, MAX_ANALYTICS_LIMIT};

/// Normalizes a search query into its analytics identity key.
///
/// Returns `None` for empty or whitespace-only input, which is never
/// recorded.
///
/// ```rust
/// use filmsearch_core::analytics::normalize_query;
///
/// assert_eq!(normalize_query("  The Matrix "), Some("the matrix".to_string()));
/// assert_eq!(normalize_query("   "), None);
/// ```
pub fn normalize_query(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Label recorded for a genre/year filter search, e.g. `Filter: Action (2001-2010)`.
pub fn filter_label(genre: Option<&str>, year_from: Option<i32>, year_to: Option<i32>) -> String {
    let genre = genre.map(str::trim).filter(|g| !g.is_empty()).unwrap_or("All");
    format!("Filter: {genre} ({})", year_span(year_from, year_to))
}

/// Label recorded when browsing a genre page, e.g. `Genre: Drama (-1999)`.
pub fn genre_label(genre: &str, year_from: Option<i32>, year_to: Option<i32>) -> String {
    format!("Genre: {} ({})", genre.trim(), year_span(year_from, year_to))
}

fn year_span(year_from: Option<i32>, year_to: Option<i32>) -> String {
    let bound = |year: Option<i32>| year.map(|y| y.to_string()).unwrap_or_default();
    format!("{}-{}", bound(year_from), bound(year_to))
}

/// Clamps a requested list size to `[1, 100]`; missing means 5.
pub fn clamp_analytics_limit(limit: Option<i64>) -> i64 {
    limit
        .map(|l| l.clamp(1, MAX_ANALYTICS_LIMIT))
        .unwrap_or(DEFAULT_ANALYTICS_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query_collapses_case_and_whitespace() {
        assert_eq!(normalize_query("Matrix"), normalize_query("matrix "));
        assert_eq!(normalize_query("\tMATRIX\n"), Some("matrix".to_string()));
        assert_eq!(normalize_query(""), None);
        // inner whitespace is part of the key
        assert_eq!(normalize_query("the  matrix"), Some("the  matrix".to_string()));
    }

    #[test]
    fn test_filter_label() {
        assert_eq!(
            filter_label(Some("Action"), Some(2001), Some(2010)),
            "Filter: Action (2001-2010)"
        );
        assert_eq!(filter_label(None, None, None), "Filter: All (-)");
        assert_eq!(filter_label(Some("  "), Some(1999), None), "Filter: All (1999-)");
    }

    #[test]
    fn test_genre_label() {
        assert_eq!(genre_label("Drama", None, Some(1999)), "Genre: Drama (-1999)");
    }

    #[test]
    fn test_clamp_analytics_limit() {
        assert_eq!(clamp_analytics_limit(None), 5);
        assert_eq!(clamp_analytics_limit(Some(0)), 1);
        assert_eq!(clamp_analytics_limit(Some(-3)), 1);
        assert_eq!(clamp_analytics_limit(Some(20)), 20);
        assert_eq!(clamp_analytics_limit(Some(1000)), 100);
    }
}
