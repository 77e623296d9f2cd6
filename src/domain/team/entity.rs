//! Team entity and related types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::player::Player;
use crate::domain::user::UserId;

/// Team identifier assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(i64);

impl TeamId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for TeamId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team entity
///
/// Exactly one team exists per user. The total squad value is not part of
/// the entity; see [`TeamWithSquad`].
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    /// Unique identifier
    id: TeamId,
    /// Owning user
    owner_id: UserId,
    /// Display name
    name: String,
    /// Country of the club
    country: String,
    /// Money available for transfers
    budget: Decimal,
}

impl Team {
    pub fn new(
        id: TeamId,
        owner_id: UserId,
        name: impl Into<String>,
        country: impl Into<String>,
        budget: Decimal,
    ) -> Self {
        Self {
            id,
            owner_id,
            name: name.into(),
            country: country.into(),
            budget,
        }
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn budget(&self) -> Decimal {
        self.budget
    }

    /// Whether the budget covers the given price
    pub fn can_afford(&self, price: Decimal) -> bool {
        self.budget >= price
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_country(&mut self, country: impl Into<String>) {
        self.country = country.into();
    }

    /// Apply a signed budget change
    pub fn adjust_budget(&mut self, delta: Decimal) {
        self.budget += delta;
    }
}

/// Data needed to create a team at registration
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub owner_id: UserId,
    pub name: String,
    pub country: String,
    pub budget: Decimal,
}

/// A team together with its current squad and derived value
#[derive(Debug, Clone, PartialEq)]
pub struct TeamWithSquad {
    pub team: Team,
    pub players: Vec<Player>,
    /// Sum of the players' base values, recomputed on every read
    pub total_value: Decimal,
}

impl TeamWithSquad {
    pub fn new(team: Team, players: Vec<Player>) -> Self {
        let total_value: Decimal = players.iter().map(|p| p.base_value()).sum();

        Self {
            team,
            players,
            total_value,
        }
    }
}
