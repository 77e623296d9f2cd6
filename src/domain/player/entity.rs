//! Player entity and related types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::team::TeamId;

/// Player identifier assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(i64);

impl PlayerId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for PlayerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playing position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DF")]
    Defender,
    #[serde(rename = "MF")]
    Midfielder,
    #[serde(rename = "AT")]
    Attacker,
}

impl Position {
    /// Short code used in storage and on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Self::Goalkeeper => "GK",
            Self::Defender => "DF",
            Self::Midfielder => "MF",
            Self::Attacker => "AT",
        }
    }

    /// Parse a short position code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "GK" => Some(Self::Goalkeeper),
            "DF" => Some(Self::Defender),
            "MF" => Some(Self::Midfielder),
            "AT" => Some(Self::Attacker),
            _ => None,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Player data before the store assigns an ID and owner
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlayer {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub age: u8,
    pub position: Position,
    pub base_value: Decimal,
}

/// Player entity
///
/// The asking price is held as an `Option` so that "listed" and "has a
/// price" cannot disagree. Unlisted players report a market price of zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    id: PlayerId,
    team_id: TeamId,
    first_name: String,
    last_name: String,
    country: String,
    age: u8,
    position: Position,
    base_value: Decimal,
    asking_price: Option<Decimal>,
}

impl Player {
    /// Create an unlisted player owned by `team_id`
    pub fn new(id: PlayerId, team_id: TeamId, data: NewPlayer) -> Self {
        Self {
            id,
            team_id,
            first_name: data.first_name,
            last_name: data.last_name,
            country: data.country,
            age: data.age,
            position: data.position,
            base_value: data.base_value,
            asking_price: None,
        }
    }

    /// Restore listing state read from storage
    ///
    /// A non-positive stored price is treated as unlisted.
    pub fn with_listing(mut self, on_transfer_list: bool, market_price: Decimal) -> Self {
        self.asking_price = if on_transfer_list && market_price > Decimal::ZERO {
            Some(market_price)
        } else {
            None
        };
        self
    }

    // Getters

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn base_value(&self) -> Decimal {
        self.base_value
    }

    pub fn on_transfer_list(&self) -> bool {
        self.asking_price.is_some()
    }

    /// Asking price, zero when not listed
    pub fn market_price(&self) -> Decimal {
        self.asking_price.unwrap_or(Decimal::ZERO)
    }

    pub fn is_owned_by(&self, team_id: TeamId) -> bool {
        self.team_id == team_id
    }

    // Mutators

    /// Put the player on the transfer list at a positive price
    pub fn list(&mut self, price: Decimal) {
        debug_assert!(price > Decimal::ZERO);
        self.asking_price = Some(price);
    }

    /// Take the player off the transfer list
    pub fn delist(&mut self) {
        self.asking_price = None;
    }

    /// Move the player to a new team with a revalued base value
    pub fn transfer_to(&mut self, team_id: TeamId, new_base_value: Decimal) {
        self.team_id = team_id;
        self.base_value = new_base_value;
        self.asking_price = None;
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    pub fn set_country(&mut self, country: impl Into<String>) {
        self.country = country.into();
    }
}
