//! Registration, login and token resolution.

use std::sync::Arc;

use email_address::EmailAddress;

use super::require;
use crate::domain::{Caller, User};
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Create an account. No session is issued.
    pub async fn register(&self, input: Registration) -> Result<User, DomainError> {
        require("username", &input.username)?;
        require("email", &input.email)?;
        require("password", &input.password)?;
        require("full name", &input.full_name)?;

        if !EmailAddress::is_valid(&input.email) {
            return Err(DomainError::Validation("email is invalid".to_string()));
        }

        if self
            .users
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(DomainError::Duplicate("username already exists".to_string()));
        }

        let password_hash = self.passwords.hash(&input.password)?;
        let user = User::new(input.username, input.email, password_hash, input.full_name);
        let saved = self.users.insert(user).await?;

        tracing::info!(user_id = %saved.id, "User registered");
        Ok(saved)
    }

    /// Verify credentials and issue a session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        require("username", username)?;
        require("password", password)?;

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.tokens.generate_token(user.id)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(Session {
            token,
            expires_in: self.tokens.expiration_seconds(),
            user,
        })
    }

    /// Resolve a bearer token to the caller it was issued for.
    pub fn authenticate(&self, token: Option<&str>) -> Result<Caller, AuthError> {
        let token = token.ok_or(AuthError::MissingAuth)?;
        let claims = self.tokens.validate_token(token)?;
        Ok(Caller::new(claims.user_id))
    }

    /// The caller's own account.
    pub async fn profile(&self, caller: &Caller) -> Result<User, DomainError> {
        self.users
            .find_by_id(caller.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", caller.user_id))
    }
}
