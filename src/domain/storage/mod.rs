//! Storage domain
//!
//! Defines the transactional repository contract shared by the registration
//! flow, the transfer engine and team management.

mod transaction;

pub use transaction::{StoreTransaction, TransactionalStore};
