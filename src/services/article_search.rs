use crate::{error::AppResult, models::Article, services::providers::NewsProvider};
use std::sync::Arc;

/// Service function for article search
///
/// Delegates to the configured NewsProvider, maintaining a clean separation
/// between HTTP routing and business logic.
pub async fn search_articles(
    provider: Arc<dyn NewsProvider>,
    query: &str,
) -> AppResult<Vec<Article>> {
    provider.search_articles(query).await
}
