//! Deposit sizing for a price range
//!
//! Turns a user's price bounds and token budgets into a spacing-aligned
//! position: the liquidity the budgets buy at the current pool price, the
//! amounts actually pulled in, and what is left over.

use serde::{Deserialize, Serialize};

use crate::error::AmmError;
use crate::liquidity::{amounts_from_liquidity, liquidity_from_amounts, range_position, RangePosition};
use crate::pool::Pool;
use crate::tick_math::{price_to_tick, round_to_spacing, tick_to_price, tick_to_sqrt_price};

/// Basis-point denominator (10 000 = 100%)
const BPS_DENOMINATOR: f64 = 10_000.0;

/// Configuration for deposit sizing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DepositConfig {
    /// Share of each budget held back so a small price move before the
    /// deposit lands does not overdraw the wallet
    pub budget_buffer_bps: u32,
}

/// Sized position for a deposit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepositPlan {
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Prices at the aligned ticks
    pub price_lower: f64,
    pub price_upper: f64,
    pub liquidity: f64,
    pub amount0: f64,
    pub amount1: f64,
    pub leftover0: f64,
    pub leftover1: f64,
    pub position: RangePosition,
}

/// Sizes deposits against a pool snapshot
#[derive(Debug, Clone, Default)]
pub struct DepositPlanner {
    config: DepositConfig,
}

impl DepositPlanner {
    pub fn new(config: DepositConfig) -> Self {
        Self { config }
    }

    /// Plan a deposit of up to `budget0`/`budget1` into `[lower_price, upper_price]`
    ///
    /// Bounds are floored to the pool's tick spacing; an upper bound that
    /// collapses onto the lower one is pushed up by one spacing.
    pub fn plan(
        &self,
        pool: &Pool,
        lower_price: f64,
        upper_price: f64,
        budget0: f64,
        budget1: f64,
    ) -> Result<DepositPlan, AmmError> {
        if !is_positive(lower_price) || !is_positive(upper_price) || lower_price >= upper_price {
            return Err(AmmError::InvalidPriceRange {
                lower: lower_price,
                upper: upper_price,
            });
        }
        for budget in [budget0, budget1] {
            if !budget.is_finite() || budget < 0.0 {
                return Err(AmmError::InvalidAmount { amount: budget });
            }
        }

        let spacing = pool.tick_spacing.max(1);
        let tick_lower = round_to_spacing(price_to_tick(lower_price), spacing);
        let mut tick_upper = round_to_spacing(price_to_tick(upper_price), spacing);
        if tick_upper <= tick_lower {
            tick_upper = tick_lower + spacing;
        }

        let sqrt_lower = tick_to_sqrt_price(tick_lower);
        let sqrt_upper = tick_to_sqrt_price(tick_upper);

        let usable = 1.0 - f64::from(self.config.budget_buffer_bps.min(10_000)) / BPS_DENOMINATOR;
        let liquidity = liquidity_from_amounts(
            pool.sqrt_price,
            sqrt_lower,
            sqrt_upper,
            budget0 * usable,
            budget1 * usable,
        );
        let (amount0, amount1) =
            amounts_from_liquidity(pool.sqrt_price, sqrt_lower, sqrt_upper, liquidity);

        Ok(DepositPlan {
            tick_lower,
            tick_upper,
            price_lower: tick_to_price(tick_lower),
            price_upper: tick_to_price(tick_upper),
            liquidity,
            amount0,
            amount1,
            leftover0: (budget0 - amount0).max(0.0),
            leftover1: (budget1 - amount1).max(0.0),
            position: range_position(pool.sqrt_price, sqrt_lower, sqrt_upper),
        })
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
