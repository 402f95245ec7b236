//! # Scribe Core
//!
//! The domain layer of the Scribe blogging backend.
//! This crate contains the post aggregate, pagination and the auth/post
//! services, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
