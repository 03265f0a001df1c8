#[cfg(test)]
mod tests {
    use crate::database::entity::{follow, group, post};
    use crate::database::postgres_repo::{
        PostgresFollowRepository, PostgresGroupRepository, PostgresPostRepository,
    };
    use quill_core::domain::{Follow, Post};
    use quill_core::error::RepoError;
    use quill_core::feed::FeedScope;
    use quill_core::ports::{BaseRepository, FollowRepository, GroupRepository, PostRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn post_model(post: &Post) -> post::Model {
        post::Model {
            id: post.id,
            text: post.text.clone(),
            published_at: post.published_at.into(),
            author_id: post.author_id,
            group_id: post.group_id,
            image: post.image.clone(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post = Post::new(uuid::Uuid::new_v4(), "Looking for ferris", None, None);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(&post)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post.id).await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.text, "Looking for ferris");
        assert_eq!(found.id, post.id);
    }

    #[tokio::test]
    async fn test_find_group_by_slug() {
        let group_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![group::Model {
                id: group_id,
                title: "Test Group".to_owned(),
                slug: "test-group".to_owned(),
                description: "About tests".to_owned(),
                created_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresGroupRepository::new(db);

        let result = repo.find_by_slug("test-group").await.unwrap().unwrap();
        assert_eq!(result.id, group_id);
        assert_eq!(result.title, "Test Group");
    }

    #[tokio::test]
    async fn test_save_inserts_when_row_is_new() {
        let post = Post::new(uuid::Uuid::new_v4(), "fresh", None, None);

        // First result: the UPDATE matches nothing. Second: the INSERT
        // RETURNING row.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new(), vec![post_model(&post)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let saved = repo.save(post.clone()).await.unwrap();
        assert_eq!(saved.id, post.id);
        assert_eq!(saved.text, "fresh");
    }

    #[tokio::test]
    async fn test_feed_page_orders_and_windows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        repo.page(FeedScope::All, 10, 10).await.unwrap();

        let log = format!("{:?}", repo.db.into_transaction_log());
        assert!(log.contains("ORDER BY"));
        assert!(log.contains("published_at"));
        assert!(log.contains("LIMIT"));
        assert!(log.contains("OFFSET"));
    }

    #[tokio::test]
    async fn test_following_scope_uses_follow_subquery() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        repo.page(FeedScope::Following(uuid::Uuid::new_v4()), 0, 10)
            .await
            .unwrap();

        let log = format!("{:?}", repo.db.into_transaction_log());
        assert!(log.contains("IN (SELECT"));
        assert!(log.contains("follows"));
    }

    #[tokio::test]
    async fn test_duplicate_follow_maps_to_constraint() {
        let follow = Follow::new(uuid::Uuid::new_v4(), uuid::Uuid::new_v4());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![sea_orm::DbErr::Custom(
                "duplicate key value violates unique constraint \"idx-follows-user-author\""
                    .to_owned(),
            )])
            .into_connection();

        let repo = PostgresFollowRepository::new(db);

        let err = repo.create(follow).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_unfollow_reports_removed_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = PostgresFollowRepository::new(db);
        let (user, author) = (uuid::Uuid::new_v4(), uuid::Uuid::new_v4());

        assert!(FollowRepository::delete(&repo, user, author).await.unwrap());
        assert!(!FollowRepository::delete(&repo, user, author).await.unwrap());
    }

    #[tokio::test]
    async fn test_follow_entity_roundtrip() {
        let follow = Follow::new(uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
        let model = follow::Model {
            id: follow.id,
            user_id: follow.user_id,
            author_id: follow.author_id,
            created_at: follow.created_at.into(),
        };

        let back: Follow = model.into();
        assert_eq!(back.id, follow.id);
        assert_eq!(back.user_id, follow.user_id);
        assert_eq!(back.author_id, follow.author_id);
    }
}
