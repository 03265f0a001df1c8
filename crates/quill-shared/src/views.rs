//! View models - the JSON shapes pages are rendered from.

use serde::{Deserialize, Serialize};

use crate::forms::FieldErrors;

/// An author as shown next to a post or on a profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: String,
    pub username: String,
    pub full_name: String,
}

/// A group reference embedded in a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: String,
    pub title: String,
    pub slug: String,
}

/// A group as shown on its own feed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// One post in a feed or on its detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub text: String,
    pub preview: String,
    /// RFC 3339 publication timestamp.
    pub published_at: String,
    pub author: AuthorView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether the requesting user may edit this post.
    pub editable: bool,
}

/// Pagination metadata rendered alongside a feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub page_size: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// The home feed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPageView {
    pub posts: Vec<PostView>,
    pub page: PageMeta,
}

/// A group's feed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupFeedView {
    pub group: GroupView,
    pub posts: Vec<PostView>,
    pub page: PageMeta,
}

/// An author's profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    pub author: AuthorView,
    pub posts_count: u64,
    /// Whether the viewer follows this author; absent for signed-out
    /// viewers and for the author's own profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<bool>,
    pub posts: Vec<PostView>,
    pub page: PageMeta,
}

/// One comment under a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub author: AuthorView,
    pub text: String,
    pub created_at: String,
}

/// The comment form as rendered under a post, carrying back the
/// submitted text and errors after a failed submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentFormView {
    pub text: String,
    pub errors: FieldErrors,
}

/// A single post's page: the post, its comments and the comment form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailView {
    pub post: PostView,
    /// Total posts by this post's author.
    pub author_posts_count: u64,
    pub comments: Vec<CommentView>,
    pub can_comment: bool,
    pub comment_form: CommentFormView,
}

/// The post create/edit form with its group choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormView {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub groups: Vec<GroupRef>,
    pub errors: FieldErrors,
    pub is_edit: bool,
}
