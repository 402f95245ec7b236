//! Data Transfer Objects - request/response types for the API.
//!
//! Request fields are optional so that missing input is reported as a
//! 400 with a specific message instead of a generic deserialization error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// POST /api/auth/register
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

/// POST /api/auth/login
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// A user's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
}

/// Successful login: the session token plus the caller's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(flatten)]
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// GET /api/post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub search: Option<String>,
}

/// GET /api/post/tag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsByTagQuery {
    pub tag: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/post/category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsByCategoryQuery {
    pub category: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// POST /api/post/add-post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddPostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// PATCH /api/post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub id: Option<Uuid>,
    pub content: Option<String>,
}

/// DELETE /api/post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletePostRequest {
    pub id: Option<Uuid>,
}

/// POST /api/post/comment - `id` is the post id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddCommentRequest {
    pub id: Option<Uuid>,
    pub content: Option<String>,
}

/// POST /api/post/reply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReplyRequest {
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub content: Option<String>,
}

/// DELETE /api/post/comment - `parentId` marks `commentId` as a reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentRequest {
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
}

/// Author projection embedded in posts, comments and replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
}

/// List entry for a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub slug: String,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub total_pages: u64,
    pub page: u64,
    pub per_page: u64,
    pub number_of_elements: u64,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: Uuid,
    pub content: String,
    pub created_by: Option<AuthorResponse>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub created_by: Option<AuthorResponse>,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<ReplyResponse>,
}

/// A full post with its comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub created_by: Option<AuthorResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comments: Vec<CommentResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_field_names() {
        let reply: AddReplyRequest = serde_json::from_str(
            r#"{"postId":"6f1c2a3e-1d2b-4c5d-8e9f-0a1b2c3d4e5f","commentId":"7f1c2a3e-1d2b-4c5d-8e9f-0a1b2c3d4e5f","content":"hi"}"#,
        )
        .unwrap();
        assert!(reply.post_id.is_some() && reply.comment_id.is_some());

        let post: AddPostRequest =
            serde_json::from_str(r#"{"title":"t","content":"c","category":"x","imageURL":"a.png"}"#)
                .unwrap();
        assert_eq!(post.image_url.as_deref(), Some("a.png"));
        assert!(post.tags.is_empty());

        let query: ListPostsQuery =
            serde_json::from_str(r#"{"page":2,"perPage":5}"#).unwrap();
        assert_eq!(query.per_page, Some(5));
        assert!(query.search.is_none());
    }

    #[test]
    fn test_login_response_is_flat() {
        let response = LoginResponse {
            message: "login success".to_string(),
            token: "jwt".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 36_000,
            user: UserResponse {
                id: Uuid::nil(),
                username: "alice".to_string(),
                email: "alice@x.com".to_string(),
                full_name: "Alice A".to_string(),
                image_url: None,
            },
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["username"], "alice");
        assert_eq!(json["fullName"], "Alice A");
        assert_eq!(json["tokenType"], "Bearer");
        assert!(json["imageURL"].is_null());
    }
}
