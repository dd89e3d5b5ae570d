//! # Quote AMM Library - Concentrated Liquidity Simulator
//!
//! ## Purpose
//!
//! Local stand-in for on-chain concentrated-liquidity pools. When a live quote
//! cannot be fetched the terminal builds a plausible pool around a reference
//! price and walks it tick by tick to preview output amounts, price impact and
//! deposit sizes.
//!
//! ## Integration Points
//!
//! - **Input Sources**: token registry (`quote_types`), pool parameters from
//!   `quote_config`, user requests in human units
//! - **Output Destinations**: the `fallback-quoter` CLI, UI previews
//! - **Fallback**: [`FallbackQuoter`] prefers any live [`QuoteSource`] and
//!   drops to the simulator on error
//!
//! ## Architecture Role
//!
//! ```text
//! tick_math ──► pool ──► generator
//!                 │
//!                 ▼
//!               swap ──► quote ──► quote_source
//!                 │
//! liquidity ──► deposit
//! ```
//!
//! ## Numerical Model
//!
//! - Price of token0 in token1 is `1.0001^tick`; the engine works in sqrt-price
//! - All curve arithmetic is `f64`: results approximate the integer on-chain
//!   implementation and are meant for previews
//! - Output amounts shown to users are truncated to token decimals with
//!   [`Decimal`]

pub mod deposit;
pub mod error;
pub mod generator;
pub mod liquidity;
pub mod pool;
pub mod quote;
pub mod quote_source;
pub mod swap;
pub mod tick_math;

pub use deposit::{DepositConfig, DepositPlan, DepositPlanner};
pub use error::{AmmError, PoolError};
pub use generator::{make_v3_pool, LiquidityShape, PoolGenerator, RangeShape, DEFAULT_BASE_LIQUIDITY};
pub use liquidity::{amounts_from_liquidity, liquidity_from_amounts, range_position, RangePosition};
pub use pool::{Pool, PoolParams, Tick, LIQUIDITY_DUST};
pub use quote::{PoolQuoter, Quote, QuoteRequest};
pub use quote_source::{FallbackQuoter, QuoteOrigin, QuoteSource};
pub use swap::{simulate_swap, SwapEngine, SwapResult, SwapStop, DEFAULT_MAX_ITERATIONS};
pub use tick_math::{price_to_tick, tick_to_price, tick_to_sqrt_price, MAX_TICK, MIN_TICK};

/// Common types for amount handling
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
