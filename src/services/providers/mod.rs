/// News data provider abstraction
///
/// A pluggable seam for the external service that supplies searchable
/// articles and the source catalog. Keeping both operations on one trait
/// ensures the ids returned by a search line up with the ids in the source
/// catalog.
use crate::{
    error::AppResult,
    models::{Article, Source},
};

pub mod newsapi;

pub use newsapi::NewsApiProvider;

/// Trait for news data providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    /// Search the provider for articles matching a query
    ///
    /// Returns matching articles already converted to the domain model,
    /// ready to be ingested into the corpus.
    async fn search_articles(&self, query: &str) -> AppResult<Vec<Article>>;

    /// Fetch the provider's source catalog
    async fn fetch_sources(&self) -> AppResult<Vec<Source>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
