//! Errors for pool validation and quoting
//!
//! The math layer is total and never returns these. They surface where a
//! caller asks a question that has no meaningful answer: an unknown pool, a
//! token outside the pair, or a walk that hit the iteration cap.

use quote_types::TypesError;
use thiserror::Error;

/// Quoting and planning failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AmmError {
    #[error("Unknown pool '{pool_id}'")]
    UnknownPool { pool_id: String },

    #[error("Token '{symbol}' is not part of pool '{pool_id}'")]
    TokenNotInPool { symbol: String, pool_id: String },

    #[error("Invalid amount {amount}: must be positive and finite")]
    InvalidAmount { amount: f64 },

    #[error("Invalid price range [{lower}, {upper}]: bounds must be positive, finite and ordered")]
    InvalidPriceRange { lower: f64, upper: f64 },

    /// The swap walk stopped on its safety valve; the partial result is not a trade
    #[error("Swap in pool '{pool_id}' reached the iteration cap of {max_iterations}")]
    IterationCapReached { pool_id: String, max_iterations: usize },

    #[error("Amount {amount} cannot be represented with {decimals} decimals")]
    NonRepresentable { amount: f64, decimals: u8 },

    #[error("Pool '{pool_id}' is already in the book")]
    DuplicatePool { pool_id: String },

    #[error(transparent)]
    Token(#[from] TypesError),
}

/// Pool invariant violations reported by [`Pool::check_invariants`](crate::Pool::check_invariants)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PoolError {
    #[error("Ticks out of order at position {position}: {previous} followed by {next}")]
    UnsortedTicks {
        position: usize,
        previous: i32,
        next: i32,
    },

    #[error("Liquidity net over all ticks is {net}, expected 0")]
    UnbalancedLiquidityNet { net: f64 },

    #[error("Active liquidity {stored} does not match {computed} derived from ticks at or below {tick}")]
    ActiveLiquidityMismatch {
        stored: f64,
        computed: f64,
        tick: i32,
    },

    #[error("Current tick {stored} does not match tick {computed} derived from sqrt price {sqrt_price}")]
    TickPriceMismatch {
        stored: i32,
        computed: i32,
        sqrt_price: f64,
    },
}
