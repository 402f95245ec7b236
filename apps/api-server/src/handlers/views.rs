//! Domain to DTO projections.

use uuid::Uuid;

use scribe_core::domain::{AuthorProfile, Comment, Page, PostSummary, PostThread, User};
use scribe_shared::dto::{
    AuthorResponse, CommentResponse, PageResponse, PostResponse, PostSummaryResponse,
    ReplyResponse, UserResponse,
};

pub fn user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        image_url: user.image_url.clone(),
    }
}

fn author(profile: &AuthorProfile) -> AuthorResponse {
    AuthorResponse {
        id: profile.id,
        username: profile.username.clone(),
        image_url: profile.image_url.clone(),
    }
}

pub fn page(page: Page<PostSummary>) -> PageResponse<PostSummaryResponse> {
    PageResponse {
        total_pages: page.total_pages,
        page: page.page,
        per_page: page.per_page,
        number_of_elements: page.number_of_elements,
        results: page
            .results
            .into_iter()
            .map(|summary| PostSummaryResponse {
                id: summary.id,
                title: summary.title,
                description: summary.description,
                image_url: summary.image_url,
                slug: summary.slug,
            })
            .collect(),
    }
}

/// A post with every `created_by` resolved. Authors whose account no
/// longer exists are rendered as `null`.
pub fn thread(thread: &PostThread) -> PostResponse {
    let post = &thread.post;
    PostResponse {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        content: post.content.clone(),
        description: post.description.clone(),
        category: post.category.clone(),
        tags: post.tags.clone(),
        image_url: post.image_url.clone(),
        created_by: thread.author(post.created_by).map(author),
        created_at: post.created_at,
        updated_at: post.updated_at,
        comments: post
            .comments
            .iter()
            .map(|c| comment(c, |id| thread.author(id)))
            .collect(),
    }
}

/// A comment with its replies, resolving authors through `lookup`.
pub fn comment<'a>(
    comment: &Comment,
    lookup: impl Fn(Uuid) -> Option<&'a AuthorProfile>,
) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        content: comment.content.clone(),
        created_by: lookup(comment.created_by).map(author),
        created_at: comment.created_at,
        replies: comment
            .replies
            .iter()
            .map(|reply| ReplyResponse {
                id: reply.id,
                content: reply.content.clone(),
                created_by: lookup(reply.created_by).map(author),
                created_at: reply.created_at,
            })
            .collect(),
    }
}
