//! Request and response types shared by the HTTP handlers

pub mod error;
pub mod json;
pub mod responses;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse};
pub use json::Json;
pub use responses::{
    MessageResponse, PlayerResponse, TeamResponse, TeamWithSquadResponse, TransferResponse,
};
