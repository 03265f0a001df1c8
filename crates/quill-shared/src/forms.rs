//! Typed form schemas. Each form deserializes from a urlencoded body and
//! validates into a checked value or a map of per-field errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const REQUIRED_MSG: &str = "This field is required.";
pub const INVALID_CHOICE_MSG: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Per-field validation messages, keyed by field name.
///
/// Backed by a `BTreeMap` so serialized output is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }
}

/// Raw submission for creating or editing a post. The `group` field is the
/// select value: empty or missing means no group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A post submission that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedPost {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

impl PostForm {
    pub fn validate(&self) -> Result<ValidatedPost, FieldErrors> {
        let mut errors = FieldErrors::new();

        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", REQUIRED_MSG);
        }

        let group_id = match self.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("group", INVALID_CHOICE_MSG);
                    None
                }
            },
        };

        let image = match self.image.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(path) => Some(path.to_string()),
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidatedPost {
            text: text.to_string(),
            group_id,
            image,
        })
    }
}

/// Raw submission for adding a comment to a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

/// A comment submission that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedComment {
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<ValidatedComment, FieldErrors> {
        let text = self.text.trim();
        if text.is_empty() {
            let mut errors = FieldErrors::new();
            errors.add("text", REQUIRED_MSG);
            return Err(errors);
        }
        Ok(ValidatedComment {
            text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_form_accepts_text_without_group() {
        let form = PostForm {
            text: "hello world".into(),
            group: None,
            image: None,
        };
        let validated = form.validate().unwrap();
        assert_eq!(validated.text, "hello world");
        assert!(validated.group_id.is_none());
        assert!(validated.image.is_none());
    }

    #[test]
    fn post_form_rejects_blank_text() {
        let form = PostForm {
            text: "   ".into(),
            group: None,
            image: None,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("text").unwrap(), &vec![REQUIRED_MSG.to_string()]);
    }

    #[test]
    fn post_form_treats_empty_group_choice_as_none() {
        let form = PostForm {
            text: "hello".into(),
            group: Some(String::new()),
            image: None,
        };
        assert!(form.validate().unwrap().group_id.is_none());
    }

    #[test]
    fn post_form_rejects_malformed_group_choice() {
        let form = PostForm {
            text: "hello".into(),
            group: Some("not-a-uuid".into()),
            image: None,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("group").unwrap(),
            &vec![INVALID_CHOICE_MSG.to_string()]
        );
    }

    #[test]
    fn post_form_collects_errors_per_field() {
        let form = PostForm {
            text: String::new(),
            group: Some("xyz".into()),
            image: None,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get("text").is_some());
        assert!(errors.get("group").is_some());
    }

    #[test]
    fn comment_form_requires_text() {
        assert!(CommentForm { text: "".into() }.validate().is_err());
        assert_eq!(
            CommentForm { text: " ok ".into() }.validate().unwrap().text,
            "ok"
        );
    }

    #[test]
    fn field_errors_serialize_deterministically() {
        let mut errors = FieldErrors::new();
        errors.add("text", REQUIRED_MSG);
        errors.add("group", INVALID_CHOICE_MSG);
        let json = serde_json::to_string(&errors).unwrap();
        assert!(json.find("group").unwrap() < json.find("text").unwrap());
    }
}
