//! Team domain

mod entity;
mod repository;
mod validation;

pub use entity::{NewTeam, Team, TeamId, TeamWithSquad};
pub use repository::TeamRepository;
pub use validation::{
    validate_country, validate_person_name, validate_team_name, TeamValidationError,
};
