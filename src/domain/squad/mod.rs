//! Initial squad generation
//!
//! Every new team receives 20 players: 3 goalkeepers, 6 defenders,
//! 6 midfielders and 5 attackers, each starting at the same base value.

use std::fmt::Debug;

use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::player::{NewPlayer, Position};

/// Starting budget of a newly registered team
pub const STARTING_BUDGET: Decimal = dec!(5000000);

/// Base value of every generated player
pub const STARTING_PLAYER_VALUE: Decimal = dec!(1000000);

/// Position counts of a generated squad
pub const SQUAD_COMPOSITION: [(Position, usize); 4] = [
    (Position::Goalkeeper, 3),
    (Position::Defender, 6),
    (Position::Midfielder, 6),
    (Position::Attacker, 5),
];

pub const SQUAD_SIZE: usize = 20;

const MIN_AGE: u8 = 18;
const MAX_AGE: u8 = 40;

const FIRST_NAMES: &[&str] = &[
    "Lucas", "Mateo", "Noah", "Liam", "Daan", "Sem", "Hugo", "Leo", "Oscar", "Luca", "Jonas",
    "Elias", "Adam", "Milan", "Finn", "Thiago", "Rafael", "Diego", "Marco", "Kai",
];

const LAST_NAMES: &[&str] = &[
    "de Jong", "Jansen", "Garcia", "Martinez", "Rossi", "Bianchi", "Muller", "Schmidt",
    "Silva", "Santos", "Dubois", "Moreau", "Smith", "Jones", "Novak", "Kowalski",
    "Andersen", "Nielsen", "Costa", "Peeters",
];

const COUNTRIES: &[&str] = &[
    "NL", "ES", "IT", "DE", "PT", "FR", "GB", "PL", "DK", "BE", "BR", "AR",
];

/// Policy producing the players of a new team
pub trait SquadGenerator: Send + Sync + Debug {
    fn generate(&self) -> Vec<NewPlayer>;
}

/// Generator drawing names, countries and ages from fixed pools
#[derive(Debug, Clone, Default)]
pub struct RandomSquadGenerator;

impl RandomSquadGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a squad using the given random source
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> Vec<NewPlayer> {
        SQUAD_COMPOSITION
            .iter()
            .flat_map(|&(position, count)| std::iter::repeat_n(position, count))
            .map(|position| NewPlayer {
                first_name: pick(rng, FIRST_NAMES),
                last_name: pick(rng, LAST_NAMES),
                country: pick(rng, COUNTRIES),
                age: rng.gen_range(MIN_AGE..=MAX_AGE),
                position,
                base_value: STARTING_PLAYER_VALUE,
            })
            .collect()
    }
}

impl SquadGenerator for RandomSquadGenerator {
    fn generate(&self) -> Vec<NewPlayer> {
        self.generate_with(&mut rand::thread_rng())
    }
}

fn pick<R: Rng>(rng: &mut R, pool: &[&str]) -> String {
    pool.choose(rng).copied().unwrap_or_default().to_string()
}
