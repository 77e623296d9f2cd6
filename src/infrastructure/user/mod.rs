//! User infrastructure module
//!
//! Password hashing for the identity store.

mod password;

pub use password::{Argon2Hasher, PasswordHasher};
