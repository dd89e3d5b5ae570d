//! Synthetic pool generation around a mid price
//!
//! When no on-chain tick data is available the terminal still needs a pool
//! to quote against. The generator stacks a few overlapping ranges centred
//! on the mid price so depth is concentrated near the current price and
//! thins out further away, which is roughly what live pools look like.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pool::{Pool, PoolParams};
use crate::tick_math::{price_to_tick, round_to_spacing, MAX_TICK, MIN_TICK};

/// Liquidity unit the default shape is scaled by
pub const DEFAULT_BASE_LIQUIDITY: f64 = 1_000_000.0;

/// One symmetric range around the centre tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeShape {
    /// Ticks on each side of the centre
    pub half_width: i32,
    /// Multiplier on the base liquidity
    pub weight: f64,
}

/// Overlapping ranges that make up a synthetic pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityShape {
    pub base_liquidity: f64,
    pub ranges: Vec<RangeShape>,
}

impl Default for LiquidityShape {
    fn default() -> Self {
        Self {
            base_liquidity: DEFAULT_BASE_LIQUIDITY,
            ranges: vec![
                RangeShape { half_width: 600, weight: 1.0 },
                RangeShape { half_width: 300, weight: 1.6 },
                RangeShape { half_width: 1200, weight: 0.6 },
            ],
        }
    }
}

/// Builds pools from [`PoolParams`] using a fixed [`LiquidityShape`]
#[derive(Debug, Clone, Default)]
pub struct PoolGenerator {
    shape: LiquidityShape,
}

impl PoolGenerator {
    pub fn new(shape: LiquidityShape) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> &LiquidityShape {
        &self.shape
    }

    /// Generate a pool whose ranges are centred on the aligned mid-price tick
    ///
    /// Each range emits `+magnitude` at its lower bound and `−magnitude` at
    /// its upper bound, so the full tick list always nets to zero.
    pub fn generate(&self, params: &PoolParams) -> Pool {
        let spacing = params.tick_spacing.max(1);
        let center = round_to_spacing(price_to_tick(params.mid_price), spacing);

        let ticks = self.shape.ranges.iter().flat_map(|range| {
            let magnitude = self.shape.base_liquidity * range.weight;
            let (lower, upper) = range_bounds(center, range.half_width, spacing);
            [(lower, magnitude), (upper, -magnitude)]
        });

        let pool = Pool::from_ticks(params, ticks);

        debug!(
            pool_id = %pool.id,
            center_tick = center,
            tick_current = pool.tick_current,
            liquidity = pool.liquidity,
            boundaries = pool.ticks.len(),
            "Generated synthetic pool"
        );

        pool
    }
}

/// Generate a pool with the default three-range shape
pub fn make_v3_pool(params: &PoolParams) -> Pool {
    PoolGenerator::default().generate(params)
}

/// Spacing-aligned `[lower, upper)` around `center`, never empty
///
/// Bounds are clamped to the tick range before alignment.
fn range_bounds(center: i32, half_width: i32, spacing: i32) -> (i32, i32) {
    let half_width = half_width.clamp(0, MAX_TICK);
    let lower = round_to_spacing(center.saturating_sub(half_width).max(MIN_TICK), spacing);
    let mut upper = round_to_spacing(center.saturating_add(half_width).min(MAX_TICK), spacing);
    if upper <= lower {
        upper = lower.saturating_add(spacing);
    }
    (lower, upper)
}
