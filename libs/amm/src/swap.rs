//! Tick-walking swap simulation
//!
//! Executes an exact-input swap against a [`Pool`] snapshot by walking its
//! initialized ticks. Inside a range liquidity is constant and the new
//! sqrt-price has a closed form; at each boundary the tick's
//! `liquidity_net` is applied and the walk continues.
//!
//! All arithmetic is `f64`. Results are a preview approximation and are not
//! bit-exact with the integer on-chain implementation.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::pool::Pool;
use crate::tick_math::{
    dx_from_to, dy_from_to, sqrt_price_to_tick, tick_to_sqrt_price, MAX_TICK, MIN_TICK,
};

/// Default bound on walk iterations
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Why the walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStop {
    /// All input was absorbed by the curve
    Filled,
    /// Amount or pool price was not positive and finite; nothing executed
    InvalidInput,
    /// The pool had no active liquidity to begin with
    NoLiquidity,
    /// Active liquidity dropped to zero after a crossing; remaining input is dropped
    LiquidityExhausted,
    /// Price reached the tick bound with input left over
    PriceLimit,
    /// The walk hit its iteration cap; the result is not a valid trade
    IterationCap,
}

/// Hypothetical pool state after a swap, plus the output amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwapResult {
    pub amount_out: f64,
    pub new_sqrt_price: f64,
    pub new_tick: i32,
    pub new_liquidity: f64,
    /// Post-fee input the curve absorbed
    pub amount_in_consumed: f64,
    pub ticks_crossed: usize,
    pub stop: SwapStop,
}

impl SwapResult {
    fn unchanged(pool: &Pool, stop: SwapStop) -> Self {
        Self {
            amount_out: 0.0,
            new_sqrt_price: pool.sqrt_price,
            new_tick: pool.tick_current,
            new_liquidity: pool.liquidity,
            amount_in_consumed: 0.0,
            ticks_crossed: 0,
            stop,
        }
    }

    /// True when the walk ended for an economic reason rather than the safety valve
    pub fn is_complete(&self) -> bool {
        self.stop != SwapStop::IterationCap
    }
}

/// Working state during the walk
#[derive(Debug, Clone)]
struct SwapState {
    amount_remaining: f64,
    amount_calculated: f64,
    sqrt_price: f64,
    tick: i32,
    liquidity: f64,
    /// Active liquidity at or below this after a crossing is zero
    dust: f64,
    ticks_crossed: usize,
}

impl SwapState {
    fn cross(&mut self, delta: f64) {
        self.liquidity += delta;
        if self.liquidity.abs() <= self.dust {
            self.liquidity = 0.0;
        }
    }
}

/// Where the next step of the walk ends
#[derive(Debug, Clone, Copy)]
struct Boundary {
    index: i32,
    sqrt_price: f64,
    /// `None` for the synthetic bound past the last initialized tick
    liquidity_net: Option<f64>,
}

/// Outcome of a single step
enum Step {
    Continue,
    Stop(SwapStop),
}

/// Swap simulator with a configurable iteration cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapEngine {
    max_iterations: usize,
}

impl Default for SwapEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}

impl SwapEngine {
    /// A cap of zero is raised to one so the walk can make progress
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
        }
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Simulate selling `amount_in` into `pool`
    ///
    /// `zero_for_one = true` sells token0 for token1 (price and tick fall);
    /// `false` sells token1 for token0. The fee is taken once from the full
    /// input before any curve math. The pool is not modified.
    pub fn simulate(&self, pool: &Pool, amount_in: f64, zero_for_one: bool) -> SwapResult {
        if !amount_in.is_finite() || amount_in <= 0.0 {
            return SwapResult::unchanged(pool, SwapStop::InvalidInput);
        }
        if !pool.sqrt_price.is_finite() || pool.sqrt_price <= 0.0 {
            return SwapResult::unchanged(pool, SwapStop::InvalidInput);
        }
        if pool.liquidity <= 0.0 {
            return SwapResult::unchanged(pool, SwapStop::NoLiquidity);
        }

        let mut state = SwapState {
            amount_remaining: amount_in * (1.0 - pool.fee),
            amount_calculated: 0.0,
            sqrt_price: pool.sqrt_price,
            tick: pool.tick_current,
            liquidity: pool.liquidity,
            dust: pool.dust_threshold(),
            ticks_crossed: 0,
        };
        let amount_in_net = state.amount_remaining;

        let mut iterations = 0;
        let stop = loop {
            if state.amount_remaining <= 0.0 {
                break SwapStop::Filled;
            }
            if state.liquidity <= 0.0 {
                break SwapStop::LiquidityExhausted;
            }
            if iterations >= self.max_iterations {
                warn!(
                    pool_id = %pool.id,
                    max_iterations = self.max_iterations,
                    tick = state.tick,
                    "Swap walk reached iteration cap"
                );
                break SwapStop::IterationCap;
            }
            iterations += 1;

            let step = if zero_for_one {
                Self::step_price_down(pool, &mut state)
            } else {
                Self::step_price_up(pool, &mut state)
            };
            if let Step::Stop(stop) = step {
                break stop;
            }
        };

        let result = SwapResult {
            amount_out: state.amount_calculated,
            new_sqrt_price: state.sqrt_price,
            new_tick: state.tick,
            new_liquidity: state.liquidity,
            amount_in_consumed: amount_in_net - state.amount_remaining.max(0.0),
            ticks_crossed: state.ticks_crossed,
            stop,
        };

        debug!(
            pool_id = %pool.id,
            amount_in,
            zero_for_one,
            amount_out = result.amount_out,
            ticks_crossed = result.ticks_crossed,
            new_tick = result.new_tick,
            stop = ?result.stop,
            "Simulated swap"
        );

        result
    }

    /// Token0 in, token1 out: sqrt-price falls toward the next boundary at or below the tick
    fn step_price_down(pool: &Pool, state: &mut SwapState) -> Step {
        let boundary = match pool.next_tick_at_or_below(state.tick) {
            Some(tick) => Boundary {
                index: tick.index,
                sqrt_price: tick.sqrt_price,
                liquidity_net: Some(tick.liquidity_net),
            },
            None => Boundary {
                index: MIN_TICK,
                sqrt_price: tick_to_sqrt_price(MIN_TICK),
                liquidity_net: None,
            },
        };

        // Zero when a snapped tick leaves the price a hair below its own boundary
        let needed = dx_from_to(state.liquidity, boundary.sqrt_price, state.sqrt_price).max(0.0);

        if state.amount_remaining < needed {
            let new_sqrt =
                1.0 / (1.0 / state.sqrt_price + state.amount_remaining / state.liquidity);
            state.amount_calculated += dy_from_to(state.liquidity, new_sqrt, state.sqrt_price);
            state.sqrt_price = new_sqrt;
            // Still inside the range: at or above the boundary, not above where we started
            state.tick = sqrt_price_to_tick(new_sqrt).max(boundary.index).min(state.tick);
            state.amount_remaining = 0.0;
            return Step::Stop(SwapStop::Filled);
        }

        state.amount_remaining -= needed;
        state.amount_calculated +=
            dy_from_to(state.liquidity, boundary.sqrt_price, state.sqrt_price).max(0.0);
        state.sqrt_price = state.sqrt_price.min(boundary.sqrt_price);

        let Some(liquidity_net) = boundary.liquidity_net else {
            state.tick = boundary.index;
            return Step::Stop(SwapStop::PriceLimit);
        };

        // Leaving the range whose lower bound this is
        state.cross(-liquidity_net);
        state.tick = boundary.index - 1;
        state.ticks_crossed += 1;
        trace!(
            pool_id = %pool.id,
            tick = boundary.index,
            liquidity = state.liquidity,
            remaining = state.amount_remaining,
            "Crossed tick downward"
        );

        Step::Continue
    }

    /// Token1 in, token0 out: sqrt-price rises toward the next boundary above the tick
    fn step_price_up(pool: &Pool, state: &mut SwapState) -> Step {
        let boundary = match pool.next_tick_above(state.tick) {
            Some(tick) => Boundary {
                index: tick.index,
                sqrt_price: tick.sqrt_price,
                liquidity_net: Some(tick.liquidity_net),
            },
            None => Boundary {
                index: MAX_TICK,
                sqrt_price: tick_to_sqrt_price(MAX_TICK),
                liquidity_net: None,
            },
        };

        let needed = dy_from_to(state.liquidity, state.sqrt_price, boundary.sqrt_price).max(0.0);

        if state.amount_remaining < needed {
            let new_sqrt = state.sqrt_price + state.amount_remaining / state.liquidity;
            state.amount_calculated += dx_from_to(state.liquidity, state.sqrt_price, new_sqrt);
            state.sqrt_price = new_sqrt;
            state.tick = sqrt_price_to_tick(new_sqrt)
                .min(boundary.index - 1)
                .max(state.tick);
            state.amount_remaining = 0.0;
            return Step::Stop(SwapStop::Filled);
        }

        state.amount_remaining -= needed;
        state.amount_calculated +=
            dx_from_to(state.liquidity, state.sqrt_price, boundary.sqrt_price).max(0.0);
        state.sqrt_price = state.sqrt_price.max(boundary.sqrt_price);

        let Some(liquidity_net) = boundary.liquidity_net else {
            state.tick = boundary.index;
            return Step::Stop(SwapStop::PriceLimit);
        };

        state.cross(liquidity_net);
        state.tick = boundary.index;
        state.ticks_crossed += 1;
        trace!(
            pool_id = %pool.id,
            tick = boundary.index,
            liquidity = state.liquidity,
            remaining = state.amount_remaining,
            "Crossed tick upward"
        );

        Step::Continue
    }
}

/// Simulate a swap with the default iteration cap
pub fn simulate_swap(pool: &Pool, amount_in: f64, zero_for_one: bool) -> SwapResult {
    SwapEngine::default().simulate(pool, amount_in, zero_for_one)
}
