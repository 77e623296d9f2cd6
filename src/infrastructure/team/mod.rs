//! Team management infrastructure

mod service;

pub use service::{TeamService, UpdatePlayerRequest, UpdateTeamRequest};
