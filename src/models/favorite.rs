use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's demonstrated interest in an article
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    /// Identifier supplied by the identity provider
    pub user_id: String,
    /// The favorited article
    pub article_id: Uuid,
    /// When the favorite was recorded
    pub favorited_at: DateTime<Utc>,
}

impl Favorite {
    /// Records a new favorite at the current time
    pub fn new(user_id: String, article_id: Uuid) -> Self {
        Self {
            user_id,
            article_id,
            favorited_at: Utc::now(),
        }
    }
}
