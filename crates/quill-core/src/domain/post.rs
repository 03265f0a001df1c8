use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a message published by an author, optionally under a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    /// Set once at creation and never changed afterwards, including edits.
    pub published_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    /// Stored path of an attached image; upload handling lives elsewhere.
    pub image: Option<String>,
}

impl Post {
    /// Create a new post published now.
    pub fn new(
        author_id: Uuid,
        text: impl Into<String>,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            published_at: Utc::now(),
            author_id,
            group_id,
            image,
        }
    }

    /// Replace the editable fields. Author and publication time stay fixed.
    pub fn edit(&mut self, text: String, group_id: Option<Uuid>, image: Option<String>) {
        self.text = text;
        self.group_id = group_id;
        self.image = image;
    }

    /// The first 15 characters of the text, used as the short display form.
    pub fn preview(&self) -> String {
        self.text.chars().take(15).collect()
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_is_fifteen_chars() {
        let author = Uuid::new_v4();
        let post = Post::new(author, "a rather long post body well past the cut", None, None);
        assert_eq!(post.preview().chars().count(), 15);
        assert_eq!(post.to_string(), "a rather long p");
    }

    #[test]
    fn preview_handles_short_and_multibyte_text() {
        let author = Uuid::new_v4();
        assert_eq!(Post::new(author, "short", None, None).preview(), "short");
        // Cyrillic chars are multi-byte; the cut is by chars, not bytes.
        let post = Post::new(author, "длинный тестовый текст поста", None, None);
        assert_eq!(post.preview(), "длинный тестовы");
    }

    #[test]
    fn edit_keeps_publication_time_and_author() {
        let author = Uuid::new_v4();
        let mut post = Post::new(author, "before", None, None);
        let published = post.published_at;
        post.edit("after".to_string(), Some(Uuid::new_v4()), None);
        assert_eq!(post.text, "after");
        assert_eq!(post.published_at, published);
        assert_eq!(post.author_id, author);
    }
}
