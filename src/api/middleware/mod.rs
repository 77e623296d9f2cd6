//! API middleware components

pub mod locale;
pub mod logging;
pub mod user_auth;

pub use locale::localize_errors;
pub use logging::logging_middleware;
pub use user_auth::{extract_bearer_token, RequireUser};
