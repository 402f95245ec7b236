//! Application services - the operations behind the HTTP surface.
//!
//! Services take an explicit [`Caller`](crate::domain::Caller) for every
//! authenticated operation and talk to storage only through the ports.

mod auth;
mod posts;

pub use auth::{AuthService, Registration, Session};
pub use posts::PostService;

use crate::error::DomainError;

/// Reject blank required text fields.
fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!(
            "you need to specify the {field}"
        )));
    }
    Ok(())
}
