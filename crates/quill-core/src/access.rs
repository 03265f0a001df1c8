//! Authorization rules - pure predicates consulted before every mutation.
//!
//! A failed predicate never turns into an error response: callers are
//! expected to redirect to a neutral view instead.

use uuid::Uuid;

use crate::domain::Post;

/// Only the author may edit a post.
pub fn can_edit_post(actor: Uuid, post: &Post) -> bool {
    post.author_id == actor
}

/// Any authenticated user may comment.
pub fn can_comment(actor: Option<Uuid>) -> bool {
    actor.is_some()
}

/// A user may follow an author they are not, and are not already following.
/// `already_following` is the current relation state supplied by the caller.
pub fn can_follow(actor: Uuid, target: Uuid, already_following: bool) -> bool {
    actor != target && !already_following
}

/// Unfollowing is always permitted for authenticated users; removing an
/// absent relation is a no-op, not an error.
pub fn can_unfollow(actor: Option<Uuid>) -> bool {
    actor.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Post;

    #[test]
    fn only_the_author_can_edit() {
        let author = Uuid::new_v4();
        let other = Uuid::new_v4();
        let post = Post::new(author, "text", None, None);

        assert!(can_edit_post(author, &post));
        assert!(!can_edit_post(other, &post));
    }

    #[test]
    fn commenting_requires_authentication() {
        assert!(can_comment(Some(Uuid::new_v4())));
        assert!(!can_comment(None));
    }

    #[test]
    fn following_rejects_self_and_duplicates() {
        let user = Uuid::new_v4();
        let author = Uuid::new_v4();

        assert!(can_follow(user, author, false));
        assert!(!can_follow(user, user, false));
        assert!(!can_follow(user, author, true));
    }

    #[test]
    fn unfollowing_is_open_to_any_authenticated_user() {
        assert!(can_unfollow(Some(Uuid::new_v4())));
        assert!(!can_unfollow(None));
    }
}
