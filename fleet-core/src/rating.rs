//! Ship rating calculation.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Latest production year accepted by the registry.
pub const CURRENT_YEAR: i32 = 3019;

const BASE_RATING: f64 = 80.0;
const USED_FACTOR: f64 = 0.5;
const RATING_SCALE: u32 = 2;

/// Compute the rating for a ship.
///
/// `80 * speed * k / (3019 - prod_year + 1)` where `k` is 0.5 for used ships
/// and 1 otherwise, rounded half away from zero to two decimal places.
pub fn compute_rating(speed: f64, used: bool, prod_year: i32) -> f64 {
    let factor = if used { USED_FACTOR } else { 1.0 };
    let age = f64::from(CURRENT_YEAR - prod_year + 1);
    round_half_up(BASE_RATING * speed * factor / age, RATING_SCALE)
}

/// Round `value` half away from zero at `scale` decimal places.
///
/// Rounding is applied to the shortest decimal representation of `value`, so
/// `2.675` rounds to `2.68` even though its binary value sits just below it.
/// Values outside the `Decimal` range are returned unchanged.
pub fn round_half_up(value: f64, scale: u32) -> f64 {
    let Some(decimal) = Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
    else {
        return value;
    };
    let rounded = decimal.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_string().parse().unwrap_or(value)
}
