//! Authentication infrastructure module
//!
//! Stateless access tokens and opaque refresh tokens.

mod jwt;
mod refresh_token;

pub use jwt::{AccessClaims, JwtConfig, JwtGenerator, JwtService, TokenType};
pub use refresh_token::{generate_refresh_token, hash_refresh_token};
