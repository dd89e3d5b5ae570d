//! Liquidity ↔ token amount conversion for a price range
//!
//! A position over `[√a, √b]` holds only token0 while the price is below
//! the range, only token1 above it, and both inside it. The two functions
//! here are exact inverses under the same three-way split.

use serde::{Deserialize, Serialize};

use crate::tick_math::{dx_from_to, dy_from_to};

/// Where the current price sits relative to a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePosition {
    Below,
    Inside,
    Above,
}

/// Classify `sqrt_price` against `[sqrt_a, sqrt_b]` (bounds may be passed in either order)
pub fn range_position(sqrt_price: f64, sqrt_a: f64, sqrt_b: f64) -> RangePosition {
    let (lower, upper) = ordered(sqrt_a, sqrt_b);
    if sqrt_price <= lower {
        RangePosition::Below
    } else if sqrt_price >= upper {
        RangePosition::Above
    } else {
        RangePosition::Inside
    }
}

/// Liquidity obtainable from depositing `amount0`/`amount1` into `[sqrt_a, sqrt_b]`
///
/// Inside the range the scarcer token limits the result; the surplus of the
/// other token is left unused. Degenerate ranges yield zero.
pub fn liquidity_from_amounts(
    sqrt_price: f64,
    sqrt_a: f64,
    sqrt_b: f64,
    amount0: f64,
    amount1: f64,
) -> f64 {
    let (lower, upper) = ordered(sqrt_a, sqrt_b);
    if !is_valid_range(lower, upper) {
        return 0.0;
    }

    match range_position(sqrt_price, lower, upper) {
        RangePosition::Below => liquidity_for_amount0(lower, upper, amount0),
        RangePosition::Above => liquidity_for_amount1(lower, upper, amount1),
        RangePosition::Inside => {
            let from0 = liquidity_for_amount0(sqrt_price, upper, amount0);
            let from1 = liquidity_for_amount1(lower, sqrt_price, amount1);
            from0.min(from1)
        }
    }
}

/// Token amounts `(amount0, amount1)` backing `liquidity` in `[sqrt_a, sqrt_b]`
pub fn amounts_from_liquidity(
    sqrt_price: f64,
    sqrt_a: f64,
    sqrt_b: f64,
    liquidity: f64,
) -> (f64, f64) {
    let (lower, upper) = ordered(sqrt_a, sqrt_b);
    if !is_valid_range(lower, upper) {
        return (0.0, 0.0);
    }

    match range_position(sqrt_price, lower, upper) {
        RangePosition::Below => (dx_from_to(liquidity, lower, upper), 0.0),
        RangePosition::Above => (0.0, dy_from_to(liquidity, lower, upper)),
        RangePosition::Inside => (
            dx_from_to(liquidity, sqrt_price, upper),
            dy_from_to(liquidity, lower, sqrt_price),
        ),
    }
}

fn liquidity_for_amount0(sqrt_a: f64, sqrt_b: f64, amount0: f64) -> f64 {
    amount0 / (1.0 / sqrt_a - 1.0 / sqrt_b)
}

fn liquidity_for_amount1(sqrt_a: f64, sqrt_b: f64, amount1: f64) -> f64 {
    amount1 / (sqrt_b - sqrt_a)
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

fn is_valid_range(lower: f64, upper: f64) -> bool {
    lower.is_finite() && upper.is_finite() && lower > 0.0 && upper > lower
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SQRT_A: f64 = 40.0;
    const SQRT_B: f64 = 60.0;

    #[test]
    fn test_below_range_uses_token0_only() {
        let liquidity = liquidity_from_amounts(30.0, SQRT_A, SQRT_B, 12.0, 1_000_000.0);
        assert_relative_eq!(liquidity, 12.0 / (1.0 / 40.0 - 1.0 / 60.0));

        let (amount0, amount1) = amounts_from_liquidity(30.0, SQRT_A, SQRT_B, liquidity);
        assert_relative_eq!(amount0, 12.0, max_relative = 1e-12);
        assert_eq!(amount1, 0.0);
    }

    #[test]
    fn test_above_range_uses_token1_only() {
        let liquidity = liquidity_from_amounts(75.0, SQRT_A, SQRT_B, 1_000_000.0, 5_000.0);
        assert_relative_eq!(liquidity, 250.0);

        let (amount0, amount1) = amounts_from_liquidity(75.0, SQRT_A, SQRT_B, liquidity);
        assert_eq!(amount0, 0.0);
        assert_relative_eq!(amount1, 5_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_inside_range_limited_by_scarcer_token() {
        let sqrt_price = 50.0;
        let (need0, need1) = amounts_from_liquidity(sqrt_price, SQRT_A, SQRT_B, 1_000.0);

        // Double the token1 budget: token0 still caps the liquidity at 1000
        let liquidity = liquidity_from_amounts(sqrt_price, SQRT_A, SQRT_B, need0, need1 * 2.0);
        assert_relative_eq!(liquidity, 1_000.0, max_relative = 1e-12);

        // Halve token0: liquidity halves
        let liquidity = liquidity_from_amounts(sqrt_price, SQRT_A, SQRT_B, need0 / 2.0, need1);
        assert_relative_eq!(liquidity, 500.0, max_relative = 1e-12);
    }

    #[test]
    fn test_bounds_accepted_in_either_order() {
        let forward = liquidity_from_amounts(50.0, SQRT_A, SQRT_B, 3.0, 700.0);
        let reversed = liquidity_from_amounts(50.0, SQRT_B, SQRT_A, 3.0, 700.0);
        assert_eq!(forward, reversed);
        assert_eq!(
            amounts_from_liquidity(50.0, SQRT_A, SQRT_B, 42.0),
            amounts_from_liquidity(50.0, SQRT_B, SQRT_A, 42.0)
        );
    }

    #[test]
    fn test_degenerate_ranges_are_neutral() {
        assert_eq!(liquidity_from_amounts(50.0, 40.0, 40.0, 1.0, 1.0), 0.0);
        assert_eq!(liquidity_from_amounts(50.0, 0.0, 40.0, 1.0, 1.0), 0.0);
        assert_eq!(amounts_from_liquidity(50.0, -1.0, 40.0, 10.0), (0.0, 0.0));
        assert_eq!(amounts_from_liquidity(50.0, 40.0, f64::NAN, 10.0), (0.0, 0.0));
    }

    #[test]
    fn test_range_position_edges() {
        assert_eq!(range_position(40.0, SQRT_A, SQRT_B), RangePosition::Below);
        assert_eq!(range_position(60.0, SQRT_A, SQRT_B), RangePosition::Above);
        assert_eq!(range_position(50.0, SQRT_B, SQRT_A), RangePosition::Inside);
    }
}
