use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{AuthorProfile, Caller};
use crate::error::DomainError;

/// Number of characters of `content` copied into a post's description.
pub const DESCRIPTION_LENGTH: usize = 55;

/// Derive a slug from a post title: spaces become hyphens, then lowercase.
///
/// No uniqueness is enforced; two posts with the same title share a slug.
pub fn slugify(title: &str) -> String {
    title.replace(' ', "-").to_lowercase()
}

/// Derive a post description from its content.
pub fn describe(content: &str) -> String {
    content.chars().take(DESCRIPTION_LENGTH).collect()
}

/// Reply entity - embedded in a [`Comment`], never nested further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: Uuid,
    pub content: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    pub fn new(created_by: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            created_by,
            created_at: Utc::now(),
        }
    }
}

/// Comment entity - embedded in a [`Post`], owning its replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Comment {
    pub fn new(created_by: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            created_by,
            created_at: Utc::now(),
            replies: Vec::new(),
        }
    }
}

trait Authored {
    fn id(&self) -> Uuid;
    fn author(&self) -> Uuid;
}

impl Authored for Comment {
    fn id(&self) -> Uuid {
        self.id
    }

    fn author(&self) -> Uuid {
        self.created_by
    }
}

impl Authored for Reply {
    fn id(&self) -> Uuid {
        self.id
    }

    fn author(&self) -> Uuid {
        self.created_by
    }
}

/// Removes the element with `id` from `items` if `caller` authored it.
fn remove_authored<T: Authored>(
    items: &mut Vec<T>,
    id: Uuid,
    caller: &Caller,
    entity_type: &'static str,
) -> Result<T, DomainError> {
    let index = items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| DomainError::not_found(entity_type, id))?;

    if items[index].author() != caller.user_id {
        return Err(DomainError::Forbidden(format!(
            "only the author can delete this {entity_type}"
        )));
    }

    Ok(items.remove(index))
}

/// Addresses a comment or a reply inside a post for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    /// A top-level comment.
    Comment(Uuid),
    /// A reply inside the comment `parent_id`.
    Reply { parent_id: Uuid, id: Uuid },
}

impl CommentTarget {
    /// Build a target from the wire form, where a parent id marks a reply.
    pub fn new(id: Uuid, parent_id: Option<Uuid>) -> Self {
        match parent_id {
            Some(parent_id) => Self::Reply { parent_id, id },
            None => Self::Comment(id),
        }
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: String,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
}

/// Post entity - the aggregate root owning comments and their replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub comments: Vec<Comment>,
    /// Incremented on every persisted mutation, used for compare-and-swap writes.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post, deriving slug and description.
    pub fn new(created_by: Uuid, input: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_by,
            slug: slugify(&input.title),
            description: describe(&input.content),
            title: input.title,
            content: input.content,
            category: input.category,
            tags: input.tags,
            image_url: input.image_url,
            comments: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, caller: &Caller) -> bool {
        self.created_by == caller.user_id
    }

    pub fn ensure_owner(&self, caller: &Caller, action: &str) -> Result<(), DomainError> {
        if self.is_owned_by(caller) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "you don't have permission to {action} this post"
            )))
        }
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            slug: self.slug.clone(),
        }
    }

    /// Replace the body. Slug and description keep their original values.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    /// Append a reply to the top-level comment `comment_id`.
    pub fn add_reply(&mut self, comment_id: Uuid, reply: Reply) -> Result<(), DomainError> {
        let comment = self
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| DomainError::not_found("comment", comment_id))?;

        comment.replies.push(reply);
        Ok(())
    }

    /// Remove a comment or reply authored by `caller`.
    pub fn remove_comment(
        &mut self,
        target: CommentTarget,
        caller: &Caller,
    ) -> Result<(), DomainError> {
        match target {
            CommentTarget::Comment(id) => {
                remove_authored(&mut self.comments, id, caller, "comment")?;
            }
            CommentTarget::Reply { parent_id, id } => {
                let parent = self
                    .comments
                    .iter_mut()
                    .find(|c| c.id == parent_id)
                    .ok_or_else(|| DomainError::not_found("comment", parent_id))?;
                remove_authored(&mut parent.replies, id, caller, "reply")?;
            }
        }
        Ok(())
    }

    /// Order comments, and each comment's replies, newest first.
    pub fn sort_thread(&mut self) {
        self.comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        for comment in &mut self.comments {
            comment.replies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
    }

    /// Every user referenced by the post, its comments and replies.
    pub fn author_ids(&self) -> Vec<Uuid> {
        let mut ids = BTreeSet::new();
        ids.insert(self.created_by);
        for comment in &self.comments {
            ids.insert(comment.created_by);
            ids.extend(comment.replies.iter().map(|r| r.created_by));
        }
        ids.into_iter().collect()
    }
}

/// List projection of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub slug: String,
}

/// A post with its thread sorted and every referenced author resolved.
#[derive(Debug, Clone)]
pub struct PostThread {
    pub post: Post,
    pub authors: HashMap<Uuid, AuthorProfile>,
}

impl PostThread {
    pub fn new(mut post: Post, authors: impl IntoIterator<Item = AuthorProfile>) -> Self {
        post.sort_thread();
        Self {
            post,
            authors: authors.into_iter().map(|a| (a.id, a)).collect(),
        }
    }

    /// Look up an author; `None` when the account was removed.
    pub fn author(&self, id: Uuid) -> Option<&AuthorProfile> {
        self.authors.get(&id)
    }
}

/// Which posts a listing should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// All posts, optionally matching `search` in title or content (case-insensitive).
    Search(Option<String>),
    /// Posts carrying this exact tag.
    Tag(String),
    /// Posts in this exact category.
    Category(String),
}

impl PostFilter {
    /// In-memory evaluation, matching what the database query does.
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::Search(None) => true,
            PostFilter::Search(Some(term)) => {
                let term = term.to_lowercase();
                post.title.to_lowercase().contains(&term)
                    || post.content.to_lowercase().contains(&term)
            }
            PostFilter::Tag(tag) => post.tags.iter().any(|t| t == tag),
            PostFilter::Category(category) => &post.category == category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn post_by(author: Uuid) -> Post {
        Post::new(
            author,
            NewPost {
                title: "Hello Rust World".to_string(),
                content: "Some content".to_string(),
                category: "programming".to_string(),
                ..Default::default()
            },
        )
    }

    fn comment_at(author: Uuid, minutes: i64) -> Comment {
        let mut comment = Comment::new(author, format!("comment {minutes}"));
        comment.created_at = Utc::now() + TimeDelta::minutes(minutes);
        comment
    }

    #[test]
    fn test_slug_and_description_are_derived() {
        let content = "a".repeat(80);
        let post = Post::new(
            Uuid::new_v4(),
            NewPost {
                title: "My First Post".to_string(),
                content: content.clone(),
                category: "misc".to_string(),
                ..Default::default()
            },
        );

        assert_eq!(post.slug, "my-first-post");
        assert_eq!(post.description, content[..55]);
        assert_eq!(post.version, 0);
    }

    #[test]
    fn test_describe_counts_characters() {
        assert_eq!(describe("short"), "short");
        let accented = "é".repeat(60);
        assert_eq!(describe(&accented).chars().count(), DESCRIPTION_LENGTH);
    }

    #[test]
    fn test_set_content_keeps_description() {
        let mut post = post_by(Uuid::new_v4());
        post.set_content("Completely different".to_string());

        assert_eq!(post.content, "Completely different");
        assert_eq!(post.description, "Some content");
        assert_eq!(post.slug, "hello-rust-world");
    }

    #[test]
    fn test_ensure_owner() {
        let owner = Caller::new(Uuid::new_v4());
        let post = post_by(owner.user_id);

        assert!(post.ensure_owner(&owner, "delete").is_ok());
        let err = post
            .ensure_owner(&Caller::new(Uuid::new_v4()), "delete")
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn test_remove_reply_leaves_siblings() {
        let alice = Caller::new(Uuid::new_v4());
        let bob = Caller::new(Uuid::new_v4());
        let mut post = post_by(alice.user_id);
        let comment = Comment::new(alice.user_id, "parent".to_string());
        let parent_id = comment.id;
        post.comments.push(comment);

        let first = Reply::new(bob.user_id, "first".to_string());
        let second = Reply::new(alice.user_id, "second".to_string());
        let first_id = first.id;
        post.add_reply(parent_id, first).unwrap();
        post.add_reply(parent_id, second).unwrap();

        post.remove_comment(
            CommentTarget::Reply {
                parent_id,
                id: first_id,
            },
            &bob,
        )
        .unwrap();

        assert_eq!(post.comments.len(), 1);
        let replies = &post.comments.iter().find(|c| c.id == parent_id).unwrap().replies;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].content, "second");
    }

    #[test]
    fn test_remove_comment_by_non_author_is_forbidden() {
        let alice = Caller::new(Uuid::new_v4());
        let mut post = post_by(alice.user_id);
        let comment = Comment::new(alice.user_id, "mine".to_string());
        let id = comment.id;
        post.comments.push(comment);

        let err = post
            .remove_comment(CommentTarget::Comment(id), &Caller::new(Uuid::new_v4()))
            .unwrap_err();

        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(post.comments.len(), 1);
    }

    #[test]
    fn test_remove_missing_targets() {
        let alice = Caller::new(Uuid::new_v4());
        let mut post = post_by(alice.user_id);

        let err = post
            .remove_comment(CommentTarget::Comment(Uuid::new_v4()), &alice)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity_type: "comment", .. }));

        let err = post
            .remove_comment(
                CommentTarget::new(Uuid::new_v4(), Some(Uuid::new_v4())),
                &alice,
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity_type: "comment", .. }));
    }

    #[test]
    fn test_add_reply_to_missing_comment() {
        let mut post = post_by(Uuid::new_v4());
        let err = post
            .add_reply(Uuid::new_v4(), Reply::new(Uuid::new_v4(), "hi".to_string()))
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn test_sort_thread_newest_first() {
        let author = Uuid::new_v4();
        let mut post = post_by(author);
        post.comments.push(comment_at(author, 1));
        post.comments.push(comment_at(author, 3));
        post.comments.push(comment_at(author, 2));

        let mut old = Reply::new(author, "old".to_string());
        old.created_at = Utc::now() - TimeDelta::hours(1);
        let new = Reply::new(author, "new".to_string());
        post.comments[0].replies.push(old);
        post.comments[0].replies.push(new);

        post.sort_thread();

        let order: Vec<_> = post.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(order, vec!["comment 3", "comment 2", "comment 1"]);
        assert_eq!(post.comments[2].replies[0].content, "new");
        assert_eq!(post.comments[2].replies[1].content, "old");
    }

    #[test]
    fn test_author_ids_are_deduplicated() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut post = post_by(alice);
        let mut comment = Comment::new(bob, "hi".to_string());
        comment.replies.push(Reply::new(alice, "hello".to_string()));
        comment.replies.push(Reply::new(bob, "again".to_string()));
        post.comments.push(comment);

        let ids = post.author_ids();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&alice) && ids.contains(&bob));
    }

    #[test]
    fn test_filter_matches() {
        let post = Post::new(
            Uuid::new_v4(),
            NewPost {
                title: "Async Rust".to_string(),
                content: "Tokio internals".to_string(),
                category: "programming".to_string(),
                tags: vec!["rust".to_string()],
                ..Default::default()
            },
        );

        assert!(PostFilter::Search(None).matches(&post));
        assert!(PostFilter::Search(Some("async".to_string())).matches(&post));
        assert!(PostFilter::Search(Some("TOKIO".to_string())).matches(&post));
        assert!(!PostFilter::Search(Some("python".to_string())).matches(&post));
        assert!(PostFilter::Tag("rust".to_string()).matches(&post));
        assert!(!PostFilter::Tag("Rust".to_string()).matches(&post));
        assert!(PostFilter::Category("programming".to_string()).matches(&post));
    }
}
