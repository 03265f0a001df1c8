use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// URL slugs are capped at this many characters.
pub const MAX_SLUG_LEN: usize = 50;

/// Group entity - a topic that posts can be published under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create a new group. A blank slug is derived from the title.
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let slug = slug.into();
        let slug = if slug.trim().is_empty() {
            slugify(&title)
        } else {
            slug
        };
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Lowercase ASCII slug of `text`, capped at [`MAX_SLUG_LEN`] characters.
pub fn slugify(text: &str) -> String {
    let slug: String = text
        .to_lowercase()
        .chars()
        .map(|ch| match ch {
            'a'..='z' | '0'..='9' => ch,
            _ => '-',
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    slug.chars()
        .take(MAX_SLUG_LEN)
        .collect::<String>()
        .trim_end_matches('-')
        .to_string()
}
