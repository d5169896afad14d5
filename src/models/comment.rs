use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user comment attached to an article
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    /// Unique identifier for the comment
    pub id: Uuid,
    /// Author, as supplied by the identity provider
    pub user_id: String,
    /// The commented article
    pub article_id: Uuid,
    /// Comment text
    pub body: String,
    /// When the comment was posted
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new comment at the current time
    pub fn new(user_id: String, article_id: Uuid, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            article_id,
            body,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_comment() {
        let article_id = Uuid::new_v4();
        let comment = Comment::new("user-1".to_string(), article_id, "Good read".to_string());
        assert_eq!(comment.user_id, "user-1");
        assert_eq!(comment.article_id, article_id);
        assert_eq!(comment.body, "Good read");
    }
}
