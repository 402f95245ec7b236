//! Post, comment and reply handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_core::domain::{CommentTarget, NewPost, PageRequest, PostFilter};
use scribe_shared::ApiResponse;
use scribe_shared::dto::{
    AddCommentRequest, AddPostRequest, AddReplyRequest, DeleteCommentRequest, DeletePostRequest,
    ListPostsQuery, PostsByCategoryQuery, PostsByTagQuery, UpdatePostRequest,
};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Missing ids are reported before any lookup happens.
fn required(value: Option<Uuid>, what: &str) -> AppResult<Uuid> {
    value.ok_or_else(|| AppError::BadRequest(format!("you need to specify the {what}")))
}

async fn list(
    state: &AppState,
    filter: PostFilter,
    page: Option<u64>,
    per_page: Option<u64>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::new(page, per_page)?;
    let page = state.posts.list_posts(filter, request).await?;
    Ok(HttpResponse::Ok().json(views::page(page)))
}

/// GET /api/post?page=&perPage=&search=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    list(&state, PostFilter::Search(query.search), query.page, query.per_page).await
}

/// GET /api/post/tag?tag=&page=&perPage=
pub async fn list_by_tag(
    state: web::Data<AppState>,
    query: web::Query<PostsByTagQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let tag = query.tag.unwrap_or_default();
    list(&state, PostFilter::Tag(tag), query.page, query.per_page).await
}

/// GET /api/post/category?category=&page=&perPage=
pub async fn list_by_category(
    state: web::Data<AppState>,
    query: web::Query<PostsByCategoryQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let category = query.category.unwrap_or_default();
    list(&state, PostFilter::Category(category), query.page, query.per_page).await
}

/// GET /api/post/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let thread = state.posts.get_by_slug(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(views::thread(&thread)))
}

/// POST /api/post/add-post
pub async fn add_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<AddPostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let thread = state
        .posts
        .create_post(
            identity.caller(),
            NewPost {
                title: req.title.unwrap_or_default(),
                content: req.content.unwrap_or_default(),
                category: req.category.unwrap_or_default(),
                image_url: req.image_url.filter(|url| !url.trim().is_empty()),
                tags: req.tags,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        "Post added successfully",
        views::thread(&thread),
    )))
}

/// PATCH /api/post
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post_id = required(req.id, "id of the post")?;

    let thread = state
        .posts
        .update_post(identity.caller(), post_id, req.content.unwrap_or_default())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        "Post updated successfully",
        views::thread(&thread),
    )))
}

/// DELETE /api/post
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<DeletePostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = required(body.into_inner().id, "id of the post")?;

    state.posts.delete_post(identity.caller(), post_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted successfully")))
}

/// POST /api/post/comment
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<AddCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post_id = required(req.id, "id of the post")?;

    // A token can outlive its account; reject before anything is written.
    let author = state.auth.profile(identity.caller()).await?.profile();
    let comment = state
        .posts
        .add_comment(identity.caller(), post_id, req.content.unwrap_or_default())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        "Comment added successfully",
        views::comment(&comment, |id| (id == author.id).then_some(&author)),
    )))
}

/// POST /api/post/reply
pub async fn add_reply(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<AddReplyRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post_id = required(req.post_id, "id of the post")?;
    let comment_id = required(req.comment_id, "id of the comment")?;

    let thread = state
        .posts
        .add_reply(
            identity.caller(),
            post_id,
            comment_id,
            req.content.unwrap_or_default(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        "Reply added successfully",
        views::thread(&thread),
    )))
}

/// DELETE /api/post/comment
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<DeleteCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post_id = required(req.post_id, "id of the post")?;
    let comment_id = required(req.comment_id, "id of the comment")?;

    let thread = state
        .posts
        .delete_comment(
            identity.caller(),
            post_id,
            CommentTarget::new(comment_id, req.parent_id),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        "Comment deleted successfully",
        views::thread(&thread),
    )))
}
