use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Article, Comment, Favorite, UserPreferences};
use crate::services::providers::NewsProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    /// External news provider used for search and the source catalog
    pub provider: Arc<dyn NewsProvider>,
    /// Default number of articles returned by /recommended
    pub recommendation_limit: usize,
}

/// Inner state that can be modified
pub struct AppStateInner {
    /// The article corpus, keyed by article id
    pub articles: HashMap<Uuid, Article>,
    /// Favorites per user id
    pub favorites: HashMap<String, Vec<Favorite>>,
    /// Comments per article id
    pub comments: HashMap<Uuid, Vec<Comment>>,
    /// Preferences per user id
    pub preferences: HashMap<String, UserPreferences>,
}

impl AppState {
    /// Creates a new empty application state
    pub fn new(provider: Arc<dyn NewsProvider>, recommendation_limit: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                articles: HashMap::new(),
                favorites: HashMap::new(),
                comments: HashMap::new(),
                preferences: HashMap::new(),
            })),
            provider,
            recommendation_limit,
        }
    }
}

impl AppStateInner {
    /// Inserts an article into the corpus, replacing any previous version
    pub fn ingest_article(&mut self, article: Article) {
        self.articles.insert(article.id, article);
    }

    /// The favorites recorded for a user, empty for unknown users
    pub fn favorites_for(&self, user_id: &str) -> &[Favorite] {
        self.favorites
            .get(user_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
