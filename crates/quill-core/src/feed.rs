//! Feed composition: scope filtering, page-number resolution and the
//! pagination math behind every post listing.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Post;
use crate::error::RepoError;
use crate::ports::PostRepository;

/// Posts shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// The filter selecting which posts belong to a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// Every post.
    All,
    /// Posts published under the given group.
    Group(Uuid),
    /// Posts by a single author.
    Author(Uuid),
    /// Posts by authors the given viewer follows.
    Following(Uuid),
}

/// Which page of a feed the caller asked for.
///
/// Requests carry the page as a raw query value; anything that is not an
/// unsigned number falls back to the last valid page rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelector {
    Number(u64),
    Last,
}

impl PageSelector {
    /// Map a raw `page` query value: absent means the first page, a number
    /// is taken as-is (and clamped later), anything else means the last page.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            None => PageSelector::Number(1),
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(PageSelector::Number)
                .unwrap_or(PageSelector::Last),
        }
    }
}

/// Pure pagination math over a total item count.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    page_size: u64,
    total_items: u64,
}

impl Pagination {
    pub fn new(page_size: u64, total_items: u64) -> Self {
        Self {
            page_size: page_size.max(1),
            total_items,
        }
    }

    /// Number of pages; an empty feed has zero.
    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(self.page_size)
    }

    /// Clamp a selector to a valid page number. Page numbers start at 1;
    /// out-of-range requests land on the nearest valid page, and an empty
    /// feed still resolves to page 1 (which renders empty).
    pub fn resolve(&self, selector: PageSelector) -> u64 {
        let last = self.total_pages().max(1);
        match selector {
            PageSelector::Number(0) => 1,
            PageSelector::Number(n) => n.min(last),
            PageSelector::Last => last,
        }
    }

    /// The (offset, limit) window for a resolved page number.
    pub fn window(&self, number: u64) -> (u64, u64) {
        ((number.saturating_sub(1)) * self.page_size, self.page_size)
    }

    pub fn has_next(&self, number: u64) -> bool {
        number < self.total_pages()
    }

    pub fn has_previous(&self, number: u64) -> bool {
        number > 1
    }
}

/// One page of a composed feed.
#[derive(Debug, Clone)]
pub struct FeedPage {
    /// Posts in non-increasing `published_at` order.
    pub items: Vec<Post>,
    pub number: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Composes ordered, paginated feeds over the post store.
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    page_size: u64,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostRepository>, page_size: u64) -> Self {
        Self {
            posts,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Count the scope, resolve the requested page and fetch its window.
    pub async fn compose(
        &self,
        scope: FeedScope,
        selector: PageSelector,
    ) -> Result<FeedPage, RepoError> {
        let total_items = self.posts.count(scope).await?;
        let pagination = Pagination::new(self.page_size, total_items);
        let number = pagination.resolve(selector);

        let items = if total_items == 0 {
            Vec::new()
        } else {
            let (offset, limit) = pagination.window(number);
            self.posts.page(scope, offset, limit).await?
        };

        Ok(FeedPage {
            items,
            number,
            page_size: self.page_size,
            total_items,
            total_pages: pagination.total_pages(),
            has_next: pagination.has_next(number),
            has_previous: pagination.has_previous(number),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[test]
    fn selector_parses_query_values() {
        assert_eq!(PageSelector::from_query(None), PageSelector::Number(1));
        assert_eq!(PageSelector::from_query(Some("2")), PageSelector::Number(2));
        assert_eq!(PageSelector::from_query(Some(" 7 ")), PageSelector::Number(7));
        assert_eq!(PageSelector::from_query(Some("abc")), PageSelector::Last);
        assert_eq!(PageSelector::from_query(Some("-1")), PageSelector::Last);
        assert_eq!(PageSelector::from_query(Some("")), PageSelector::Last);
    }

    #[test]
    fn thirteen_items_make_two_pages_of_ten() {
        let pagination = Pagination::new(10, 13);
        assert_eq!(pagination.total_pages(), 2);
        assert_eq!(pagination.window(1), (0, 10));
        assert_eq!(pagination.window(2), (10, 10));
    }

    #[test]
    fn out_of_range_pages_clamp() {
        let pagination = Pagination::new(10, 13);
        assert_eq!(pagination.resolve(PageSelector::Number(3)), 2);
        assert_eq!(pagination.resolve(PageSelector::Number(0)), 1);
        assert_eq!(pagination.resolve(PageSelector::Last), 2);
        assert_eq!(pagination.resolve(PageSelector::Number(2)), 2);
    }

    #[test]
    fn empty_feed_has_zero_pages_but_resolves_to_one() {
        let pagination = Pagination::new(10, 0);
        assert_eq!(pagination.total_pages(), 0);
        assert_eq!(pagination.resolve(PageSelector::Number(5)), 1);
        assert_eq!(pagination.resolve(PageSelector::Last), 1);
        assert!(!pagination.has_next(1));
        assert!(!pagination.has_previous(1));
    }

    #[test]
    fn page_flags_track_position() {
        let pagination = Pagination::new(10, 25);
        assert!(pagination.has_next(1));
        assert!(!pagination.has_previous(1));
        assert!(pagination.has_next(2));
        assert!(pagination.has_previous(2));
        assert!(!pagination.has_next(3));
        assert!(pagination.has_previous(3));
    }

    /// Fixed-size stub so compose() can be exercised without a database.
    struct StubPosts {
        posts: Vec<Post>,
    }

    #[async_trait]
    impl crate::ports::BaseRepository<Post, Uuid> for StubPosts {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
            Ok(self.posts.iter().find(|p| p.id == id).cloned())
        }

        async fn save(&self, entity: Post) -> Result<Post, RepoError> {
            Ok(entity)
        }

        async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
            Ok(())
        }
    }

    #[async_trait]
    impl PostRepository for StubPosts {
        async fn count(&self, _scope: FeedScope) -> Result<u64, RepoError> {
            Ok(self.posts.len() as u64)
        }

        async fn page(
            &self,
            _scope: FeedScope,
            offset: u64,
            limit: u64,
        ) -> Result<Vec<Post>, RepoError> {
            Ok(self
                .posts
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
            Ok(self.posts.iter().filter(|p| p.author_id == author_id).count() as u64)
        }
    }

    fn service_with(n: usize) -> FeedService {
        let author = Uuid::new_v4();
        let posts = (0..n)
            .map(|i| Post::new(author, format!("post {i}"), None, None))
            .collect();
        FeedService::new(Arc::new(StubPosts { posts }), DEFAULT_PAGE_SIZE)
    }

    #[tokio::test]
    async fn compose_splits_thirteen_posts_ten_and_three() {
        let feed = service_with(13);

        let first = feed
            .compose(FeedScope::All, PageSelector::Number(1))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_pages, 2);
        assert!(first.has_next);
        assert!(!first.has_previous);

        let second = feed
            .compose(FeedScope::All, PageSelector::Number(2))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 3);
        assert!(!second.has_next);
        assert!(second.has_previous);

        let clamped = feed
            .compose(FeedScope::All, PageSelector::Number(3))
            .await
            .unwrap();
        assert_eq!(clamped.number, 2);
        assert_eq!(clamped.items.len(), 3);
    }

    #[tokio::test]
    async fn compose_empty_scope_yields_empty_page() {
        let feed = service_with(0);
        let page = feed
            .compose(FeedScope::All, PageSelector::Number(4))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }
}
