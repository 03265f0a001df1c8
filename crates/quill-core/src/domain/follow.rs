use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Follow entity - a directed subscription from one user to an author.
/// At most one row may exist per (user, author) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    pub id: Uuid,
    /// The subscriber.
    pub user_id: Uuid,
    /// The author being followed.
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    /// Create a new follow relation.
    pub fn new(user_id: Uuid, author_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            author_id,
            created_at: Utc::now(),
        }
    }
}
