use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A news article as held in the corpus
///
/// Articles are immutable once ingested. The id is derived from the article
/// URL (UUID v5), so re-ingesting the same article yields the same id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    /// Stable unique identifier
    pub id: Uuid,
    /// Headline
    pub title: String,
    /// Description or lead paragraph (may be empty)
    pub description: String,
    /// Canonical URL of the article
    pub url: String,
    /// Topic label, when the source reports one (e.g. "business")
    pub category: Option<String>,
    /// Identifier of the publishing source (e.g. "bbc-news")
    pub source: String,
    /// Publication timestamp
    pub published_at: DateTime<Utc>,
}

impl Article {
    /// Creates an article with an id derived from its URL
    pub fn new(
        title: String,
        description: String,
        url: String,
        category: Option<String>,
        source: String,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Self::id_for_url(&url),
            title,
            description,
            url,
            category,
            source,
            published_at,
        }
    }

    /// Derives the stable article id from its URL
    pub fn id_for_url(url: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_URL, url.as_bytes())
    }
}
