//! Response bodies for team and market endpoints
//!
//! Money is serialized as a decimal string (`"1500000.00"`) so no
//! precision is lost on the way to the client.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::player::{Player, PlayerId, Position};
use crate::domain::team::{Team, TeamId, TeamWithSquad};
use crate::domain::TransferReceipt;

/// Player as shown to clients
#[derive(Debug, Clone, Serialize)]
pub struct PlayerResponse {
    pub id: PlayerId,
    pub team_id: TeamId,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub age: u8,
    pub position: Position,
    pub value: Decimal,
    pub market_price: Decimal,
    pub on_transfer_list: bool,
}

impl From<&Player> for PlayerResponse {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id(),
            team_id: player.team_id(),
            first_name: player.first_name().to_string(),
            last_name: player.last_name().to_string(),
            country: player.country().to_string(),
            age: player.age(),
            position: player.position(),
            value: player.base_value(),
            market_price: player.market_price(),
            on_transfer_list: player.on_transfer_list(),
        }
    }
}

/// Team summary
#[derive(Debug, Clone, Serialize)]
pub struct TeamResponse {
    pub id: TeamId,
    pub name: String,
    pub country: String,
    pub budget: Decimal,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id(),
            name: team.name().to_string(),
            country: team.country().to_string(),
            budget: team.budget(),
        }
    }
}

/// Team with its squad and the squad's total value
#[derive(Debug, Clone, Serialize)]
pub struct TeamWithSquadResponse {
    #[serde(flatten)]
    pub team: TeamResponse,
    pub total_value: Decimal,
    pub players: Vec<PlayerResponse>,
}

impl From<&TeamWithSquad> for TeamWithSquadResponse {
    fn from(view: &TeamWithSquad) -> Self {
        Self {
            team: TeamResponse::from(&view.team),
            total_value: view.total_value,
            players: view.players.iter().map(PlayerResponse::from).collect(),
        }
    }
}

/// Translated confirmation with an optional payload
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl MessageResponse<()> {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> MessageResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Result of a completed purchase
pub type TransferResponse = MessageResponse<TransferReceipt>;
