use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use scribe_core::domain::{Comment, NewPost, Post, Reply};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, PostRepository, UserRepository};

use crate::database::entity::post::{self, CommentList};
use crate::database::entity::user;
use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

fn post_model(id: Uuid, author: Uuid) -> post::Model {
    let now = Utc::now();
    let mut comment = Comment::new(author, "First!".to_owned());
    comment.replies.push(Reply::new(Uuid::new_v4(), "Welcome".to_owned()));

    post::Model {
        id,
        created_by: author,
        title: "Test Post".to_owned(),
        slug: "test-post".to_owned(),
        content: "Content".to_owned(),
        description: "Content".to_owned(),
        category: "testing".to_owned(),
        tags: vec!["rust".to_owned()],
        image_url: None,
        comments: CommentList(vec![comment]),
        version: 3,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn exec_result(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

#[tokio::test]
async fn test_find_post_by_slug_decodes_thread() {
    let post_id = Uuid::new_v4();
    let author = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, author)]])
        .into_connection();

    let repo = PostgresPostRepository::new(Arc::new(db));

    let post = repo.find_by_slug("test-post").await.unwrap().unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.version, 3);
    assert_eq!(post.tags, vec!["rust".to_owned()]);
    assert_eq!(post.comments.len(), 1);
    assert_eq!(post.comments[0].created_by, author);
    assert_eq!(post.comments[0].replies[0].content, "Welcome");
}

#[tokio::test]
async fn test_find_post_by_id_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(Arc::new(db));

    let result: Option<Post> = repo.find_by_id(Uuid::new_v4()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_versioned_bumps_version() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec_result(1)])
        .into_connection();

    let repo = PostgresPostRepository::new(Arc::new(db));
    let post: Post = post_model(Uuid::new_v4(), Uuid::new_v4()).into();

    let stored = repo.update_versioned(post).await.unwrap();

    assert_eq!(stored.version, 4);
}

#[tokio::test]
async fn test_update_versioned_conflict() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec_result(0)])
        .into_connection();

    let repo = PostgresPostRepository::new(Arc::new(db));
    let post = Post::new(Uuid::new_v4(), NewPost::default());

    let result = repo.update_versioned(post).await;

    assert!(matches!(result, Err(RepoError::VersionConflict)));
}

#[tokio::test]
async fn test_append_comment_to_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec_result(0)])
        .into_connection();

    let repo = PostgresPostRepository::new(Arc::new(db));

    let result = repo
        .append_comment(
            Uuid::new_v4(),
            Comment::new(Uuid::new_v4(), "hello".to_owned()),
        )
        .await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_user_by_username() {
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user::Model {
            id: user_id,
            username: "alice".to_owned(),
            email: "alice@x.com".to_owned(),
            password_hash: "hash".to_owned(),
            full_name: "Alice A".to_owned(),
            image_url: Some("alice.png".to_owned()),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(Arc::new(db));

    let user = repo.find_by_username("alice").await.unwrap().unwrap();

    assert_eq!(user.id, user_id);
    assert_eq!(user.full_name, "Alice A");
    assert_eq!(user.image_url.as_deref(), Some("alice.png"));
}

#[tokio::test]
async fn test_find_users_by_empty_ids_skips_query() {
    // No query results are queued: a query would fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let repo = PostgresUserRepository::new(Arc::new(db));

    assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
}
