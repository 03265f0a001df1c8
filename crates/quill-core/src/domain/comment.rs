use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - a reply left under a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub post_id: Uuid,
}

impl Comment {
    /// Create a new comment stamped now.
    pub fn new(author_id: Uuid, post_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            created_at: Utc::now(),
            author_id,
            post_id,
        }
    }
}
