//! User domain
//!
//! This module provides domain types and traits for user identities,
//! including user entities, credential validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{
    normalize_email, validate_email, validate_password, UserValidationError,
    MIN_PASSWORD_LENGTH,
};
