//! Post listing, lookup and aggregate mutations.

use std::sync::Arc;

use uuid::Uuid;

use super::require;
use crate::domain::{
    Caller, Comment, CommentTarget, NewPost, Page, PageRequest, Post, PostFilter, PostSummary,
    PostThread, Reply, User,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, UserRepository};

/// Maps a repository miss on `post_id` to a post-specific error.
fn post_missing(post_id: Uuid) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found("post", post_id),
        other => other.into(),
    }
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// Filter, sort newest first, then slice one page in memory.
    pub async fn list_posts(
        &self,
        filter: PostFilter,
        request: PageRequest,
    ) -> Result<Page<PostSummary>, DomainError> {
        let filter = match filter {
            PostFilter::Tag(tag) => {
                require("tag", &tag)?;
                PostFilter::Tag(tag)
            }
            PostFilter::Category(category) => {
                require("category", &category)?;
                PostFilter::Category(category)
            }
            PostFilter::Search(term) => {
                PostFilter::Search(term.filter(|t| !t.trim().is_empty()))
            }
        };

        let posts = self.posts.search(&filter).await?;
        Ok(Page::paginate(posts, request).map(|post| post.summary()))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<PostThread, DomainError> {
        require("slug", slug)?;

        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("post", slug))?;

        self.thread(post).await
    }

    pub async fn create_post(
        &self,
        caller: &Caller,
        input: NewPost,
    ) -> Result<PostThread, DomainError> {
        require("title", &input.title)?;
        require("content", &input.content)?;
        require("category", &input.category)?;

        let post = self.posts.insert(Post::new(caller.user_id, input)).await?;
        tracing::info!(post_id = %post.id, slug = %post.slug, "Post created");

        self.thread(post).await
    }

    /// Replace a post's content. Only the owner may do this.
    pub async fn update_post(
        &self,
        caller: &Caller,
        post_id: Uuid,
        content: String,
    ) -> Result<PostThread, DomainError> {
        require("new content of the post", &content)?;

        let mut post = self.load(post_id).await?;
        self.authorize_owner(&post, caller, "update")?;

        post.set_content(content);
        let post = self.posts.update_versioned(post).await?;
        tracing::info!(post_id = %post.id, version = post.version, "Post updated");

        self.thread(post).await
    }

    /// Delete a post. Only the owner may do this.
    pub async fn delete_post(&self, caller: &Caller, post_id: Uuid) -> Result<(), DomainError> {
        let post = self.load(post_id).await?;
        self.authorize_owner(&post, caller, "delete")?;

        self.posts
            .delete(post_id)
            .await
            .map_err(post_missing(post_id))?;
        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    /// Append a top-level comment without rewriting the rest of the post.
    pub async fn add_comment(
        &self,
        caller: &Caller,
        post_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        require("content of the comment", &content)?;

        let comment = Comment::new(caller.user_id, content);
        self.posts
            .append_comment(post_id, comment.clone())
            .await
            .map_err(post_missing(post_id))?;

        tracing::info!(post_id = %post_id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }

    /// Append a reply to a top-level comment.
    pub async fn add_reply(
        &self,
        caller: &Caller,
        post_id: Uuid,
        comment_id: Uuid,
        content: String,
    ) -> Result<PostThread, DomainError> {
        require("content of the reply", &content)?;

        let mut post = self.load(post_id).await?;
        let reply = Reply::new(caller.user_id, content);
        let reply_id = reply.id;
        post.add_reply(comment_id, reply)?;

        let post = self.posts.update_versioned(post).await?;
        tracing::info!(post_id = %post_id, comment_id = %comment_id, reply_id = %reply_id, "Reply added");

        self.thread(post).await
    }

    /// Remove a comment or reply. Only its author may do this.
    pub async fn delete_comment(
        &self,
        caller: &Caller,
        post_id: Uuid,
        target: CommentTarget,
    ) -> Result<PostThread, DomainError> {
        let mut post = self.load(post_id).await?;

        if let Err(err) = post.remove_comment(target, caller) {
            if let DomainError::Forbidden(_) = err {
                tracing::warn!(post_id = %post_id, user_id = %caller.user_id, ?target, "Comment deletion rejected");
            }
            return Err(err);
        }

        let post = self.posts.update_versioned(post).await?;
        tracing::info!(post_id = %post_id, ?target, "Comment deleted");

        self.thread(post).await
    }

    async fn load(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    fn authorize_owner(
        &self,
        post: &Post,
        caller: &Caller,
        action: &str,
    ) -> Result<(), DomainError> {
        post.ensure_owner(caller, action).inspect_err(|_| {
            tracing::warn!(
                post_id = %post.id,
                user_id = %caller.user_id,
                action,
                "Post ownership check failed"
            );
        })
    }

    /// Resolve every author referenced by the post and sort its thread.
    async fn thread(&self, post: Post) -> Result<PostThread, DomainError> {
        let users = self.users.find_by_ids(&post.author_ids()).await?;
        Ok(PostThread::new(post, users.iter().map(User::profile)))
    }
}
