use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - an account that can write posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String, full_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            full_name,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn profile(&self) -> AuthorProfile {
        AuthorProfile {
            id: self.id,
            username: self.username.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Public projection of a user attached to posts, comments and replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorProfile {
    pub id: Uuid,
    pub username: String,
    pub image_url: Option<String>,
}

/// The authenticated identity on whose behalf a service call runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
}

impl Caller {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}
