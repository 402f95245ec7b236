//! Domain entities - the core business objects.

mod pagination;
mod post;
mod user;

pub use pagination::{Page, PageRequest};
pub use post::{
    Comment, CommentTarget, DESCRIPTION_LENGTH, NewPost, Post, PostFilter, PostSummary,
    PostThread, Reply, describe, slugify,
};
pub use user::{AuthorProfile, Caller, User};
