//! Player domain

mod entity;
mod repository;

pub use entity::{NewPlayer, Player, PlayerId, Position};
pub use repository::PlayerRepository;
