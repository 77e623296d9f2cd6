//! Registration infrastructure module

mod service;

pub use service::{RegisterRequest, Registration, RegistrationService};
