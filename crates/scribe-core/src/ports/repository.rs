use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, PostFilter, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Load every user in `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Post repository. Comments and replies are stored inside the post.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Find the oldest post with this slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// All posts matching `filter`, newest first.
    async fn search(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;

    /// Atomically append a comment and bump the version.
    ///
    /// Returns `RepoError::NotFound` when no post has this id.
    async fn append_comment(&self, post_id: Uuid, comment: Comment) -> Result<(), RepoError>;

    /// Write the whole aggregate if its stored version still equals `post.version`.
    ///
    /// Returns the stored post with the incremented version, or
    /// `RepoError::VersionConflict` when another write got there first.
    async fn update_versioned(&self, post: Post) -> Result<Post, RepoError>;
}
