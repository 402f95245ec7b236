//! Authentication handlers.

use actix_web::{HttpResponse, web};

use scribe_core::services::Registration;
use scribe_shared::ApiResponse;
use scribe_shared::dto::{LoginRequest, LoginResponse, RegisterUserRequest};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    state
        .auth
        .register(Registration {
            username: req.username.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
            full_name: req.full_name.unwrap_or_default(),
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Account created successfully")))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state
        .auth
        .login(
            req.username.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "login success".to_string(),
        token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in,
        user: views::user(&session.user),
    }))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.auth.profile(identity.caller()).await?;
    Ok(HttpResponse::Ok().json(views::user(&user)))
}
