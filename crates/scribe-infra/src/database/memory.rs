//! In-memory repositories - used when no database is configured and in tests.
//!
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{Comment, Post, PostFilter, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, PostRepository, UserRepository};

/// User store keyed by id, with unique usernames.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if store
            .values()
            .any(|u| u.id == user.id || u.username == user.username)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let store = self.store.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }
}

/// Post store keyed by id. Every operation runs under one lock, so the
/// version check in `update_versioned` is atomic.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|p| p.slug == slug)
            .min_by_key(|p| p.created_at)
            .cloned())
    }

    async fn search(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn append_comment(&self, post_id: Uuid, comment: Comment) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let post = store.get_mut(&post_id).ok_or(RepoError::NotFound)?;

        post.comments.push(comment);
        post.version += 1;
        post.updated_at = Utc::now();
        Ok(())
    }

    async fn update_versioned(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        let stored = match store.get_mut(&post.id) {
            Some(stored) if stored.version == post.version => stored,
            _ => return Err(RepoError::VersionConflict),
        };

        *stored = Post {
            version: post.version + 1,
            updated_at: Utc::now(),
            ..post
        };
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::domain::NewPost;

    fn post(title: &str, tags: &[&str]) -> Post {
        Post::new(
            Uuid::new_v4(),
            NewPost {
                title: title.to_string(),
                content: format!("{title} body"),
                category: "general".to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_username_is_unique() {
        let repo = InMemoryUserRepository::new();
        let alice = User::new(
            "alice".to_string(),
            "alice@x.com".to_string(),
            "hash".to_string(),
            "Alice A".to_string(),
        );
        let other = User::new(
            "alice".to_string(),
            "other@x.com".to_string(),
            "hash".to_string(),
            "Other".to_string(),
        );

        repo.insert(alice.clone()).await.unwrap();

        assert!(matches!(
            repo.insert(other).await,
            Err(RepoError::Constraint(_))
        ));
        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
    }

    #[tokio::test]
    async fn test_search_filters_and_sorts_newest_first() {
        let repo = InMemoryPostRepository::new();
        let mut older = post("Rust Basics", &["rust"]);
        older.created_at = Utc::now() - chrono::TimeDelta::days(1);
        let newer = post("Rust Advanced", &["rust", "async"]);
        let other = post("Gardening", &["plants"]);

        repo.insert(older.clone()).await.unwrap();
        repo.insert(newer.clone()).await.unwrap();
        repo.insert(other).await.unwrap();

        let found = repo
            .search(&PostFilter::Tag("rust".to_string()))
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);

        let all = repo.search(&PostFilter::Search(None)).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_versioned_rejects_stale_writes() {
        let repo = InMemoryPostRepository::new();
        let original = repo.insert(post("Versioned", &[])).await.unwrap();

        let mut first = original.clone();
        first.set_content("first".to_string());
        let stored = repo.update_versioned(first).await.unwrap();
        assert_eq!(stored.version, 1);

        let mut stale = original;
        stale.set_content("stale".to_string());
        assert!(matches!(
            repo.update_versioned(stale).await,
            Err(RepoError::VersionConflict)
        ));

        let current = repo.find_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(current.content, "first");
    }

    #[tokio::test]
    async fn test_append_comment_invalidates_readers() {
        let repo = InMemoryPostRepository::new();
        let snapshot = repo.insert(post("Busy", &[])).await.unwrap();

        repo.append_comment(snapshot.id, Comment::new(Uuid::new_v4(), "hi".to_string()))
            .await
            .unwrap();

        assert!(matches!(
            repo.update_versioned(snapshot.clone()).await,
            Err(RepoError::VersionConflict)
        ));
        let current = repo.find_by_id(snapshot.id).await.unwrap().unwrap();
        assert_eq!(current.comments.len(), 1);
        assert_eq!(current.version, 1);
    }

    #[tokio::test]
    async fn test_append_comment_to_missing_post() {
        let repo = InMemoryPostRepository::new();

        let result = repo
            .append_comment(Uuid::new_v4(), Comment::new(Uuid::new_v4(), "hi".to_string()))
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
