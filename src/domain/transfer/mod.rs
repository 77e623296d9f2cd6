//! Transfer market domain

mod appreciation;

pub use appreciation::{
    appreciate, AppreciationSource, FixedAppreciation, RandomAppreciation, MAX_FACTOR_BPS,
    MAX_PLAYER_VALUE, MIN_FACTOR_BPS,
};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::player::PlayerId;
use crate::domain::team::TeamId;

/// Outcome of a completed purchase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferReceipt {
    pub player_id: PlayerId,
    pub seller_team_id: TeamId,
    pub buyer_team_id: TeamId,
    pub price: Decimal,
    pub new_base_value: Decimal,
}
