//! Transfer market infrastructure

mod service;

pub use service::{TransferService, MAX_ASKING_PRICE};
