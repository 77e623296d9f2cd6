//! Infrastructure layer - Stores, credentials and application services

pub mod auth;
pub mod logging;
pub mod registration;
pub mod session;
pub mod storage;
pub mod team;
pub mod transfer;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;
