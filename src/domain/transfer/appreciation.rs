//! Post-transfer revaluation of a player's base value

use std::fmt::Debug;

use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Lower bound of the appreciation factor, in basis points (inclusive)
pub const MIN_FACTOR_BPS: i64 = 11_000;

/// Upper bound of the appreciation factor, in basis points (exclusive)
pub const MAX_FACTOR_BPS: i64 = 20_000;

/// Largest player value a `NUMERIC(14,2)` column can hold
pub const MAX_PLAYER_VALUE: Decimal = dec!(999999999999.99);

/// Source of the multiplier applied to a player's value after a purchase
///
/// Factors lie in `[1.1, 2.0)`.
pub trait AppreciationSource: Send + Sync + Debug {
    fn factor(&self) -> Decimal;
}

/// Uniformly random factor at basis-point resolution
#[derive(Debug, Clone, Default)]
pub struct RandomAppreciation;

impl RandomAppreciation {
    pub fn new() -> Self {
        Self
    }
}

impl AppreciationSource for RandomAppreciation {
    fn factor(&self) -> Decimal {
        let bps = rand::thread_rng().gen_range(MIN_FACTOR_BPS..MAX_FACTOR_BPS);
        Decimal::new(bps, 4)
    }
}

/// Always returns the same factor, clamped into the valid range
#[derive(Debug, Clone)]
pub struct FixedAppreciation {
    factor: Decimal,
}

impl FixedAppreciation {
    pub fn new(factor: Decimal) -> Self {
        let min = Decimal::new(MIN_FACTOR_BPS, 4);
        let max = Decimal::new(MAX_FACTOR_BPS - 1, 4);

        Self {
            factor: factor.clamp(min, max),
        }
    }
}

impl AppreciationSource for FixedAppreciation {
    fn factor(&self) -> Decimal {
        self.factor
    }
}

/// Apply a factor to a value, rounded to whole cents
///
/// The result saturates at [`MAX_PLAYER_VALUE`].
pub fn appreciate(value: Decimal, factor: Decimal) -> Decimal {
    value
        .checked_mul(factor)
        .map_or(MAX_PLAYER_VALUE, |grown| grown.round_dp(2).min(MAX_PLAYER_VALUE))
}
