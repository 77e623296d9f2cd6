//! Session domain
//!
//! Sessions back the long-lived refresh credential. Access credentials are
//! stateless and never stored.

mod entity;
mod repository;

pub use entity::{NewSession, Session, SessionId};
pub use repository::SessionRepository;
