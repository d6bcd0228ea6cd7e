//! Sidebar data shared by every page.

use tracing::debug;

use filmsearch_core::{CatalogOverview, DEFAULT_ANALYTICS_LIMIT};

use crate::error::DbResult;
use crate::repository::analytics::SearchAnalyticsRepository;
use crate::repository::film::FilmRepository;

/// Gathers category stats, popular and recent searches, and year bounds.
///
/// Each part degrades on its own; only a connection failure fails the whole
/// overview.
pub async fn catalog_overview(
    films: &FilmRepository,
    analytics: &SearchAnalyticsRepository,
) -> DbResult<CatalogOverview> {
    let categories = films.category_stats().await?;
    let years = films.year_bounds().await?;
    let popular = analytics.top_queries(DEFAULT_ANALYTICS_LIMIT).await?;
    let recent = analytics.recent_queries(DEFAULT_ANALYTICS_LIMIT).await?;

    debug!(
        categories = categories.len(),
        popular = popular.len(),
        recent = recent.len(),
        "Catalog overview assembled"
    );

    Ok(CatalogOverview {
        categories,
        popular,
        recent,
        years,
    })
}
