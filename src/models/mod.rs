use chrono::{DateTime, Utc};
use serde::Deserialize;

mod article;
mod comment;
mod favorite;
mod source;
mod user_preferences;

pub use article::Article;
pub use comment::Comment;
pub use favorite::Favorite;
pub use source::Source;
pub use user_preferences::UserPreferences;

// ============================================================================
// News API Types
// ============================================================================

/// Raw response from GET /everything
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArticlesResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: u32,
    pub articles: Vec<ApiArticle>,
}

/// A single article as returned by the news API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArticle {
    pub source: ApiSourceRef,
    #[serde(default)]
    pub author: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

/// Source reference embedded in an article response
///
/// The provider omits the id for sources it has not indexed; the display
/// name is always present and used as a fallback identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSourceRef {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

impl From<ApiArticle> for Article {
    fn from(api: ApiArticle) -> Self {
        // Prefer the indexed source id; fall back to the display name
        let source = api
            .source
            .id
            .unwrap_or_else(|| api.source.name.to_lowercase());

        Article::new(
            api.title,
            api.description.unwrap_or_default(),
            api.url,
            None,
            source,
            api.published_at,
        )
    }
}

/// Raw response from GET /sources
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSourcesResponse {
    pub status: String,
    pub sources: Vec<ApiSource>,
}

/// A publisher entry as returned by the news API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<ApiSource> for Source {
    fn from(api: ApiSource) -> Self {
        Source {
            id: api.id,
            name: api.name,
            category: api.category,
            url: api.url,
        }
    }
}
