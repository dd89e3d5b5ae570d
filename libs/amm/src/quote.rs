//! Human-unit quotes against a book of simulated pools
//!
//! The UI asks "how much of X do I get for N of Y in pool P". This module
//! resolves direction from the token symbol, runs the swap engine, and
//! reports the output truncated to the output token's decimals together with
//! the price impact.

use std::collections::BTreeMap;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AmmError;
use crate::pool::Pool;
use crate::swap::{SwapEngine, SwapResult, SwapStop};

/// Decimal places kept on the reported price impact
const PRICE_IMPACT_DP: u32 = 4;

/// Exact-input quote request in human units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub pool_id: String,
    pub token_in: String,
    pub amount_in: f64,
}

impl QuoteRequest {
    pub fn new(pool_id: impl Into<String>, token_in: impl Into<String>, amount_in: f64) -> Self {
        Self {
            pool_id: pool_id.into(),
            token_in: token_in.into(),
            amount_in,
        }
    }
}

/// Quote returned to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub pool_id: String,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: f64,
    /// Truncated toward zero at the output token's decimals
    pub amount_out: Decimal,
    /// Token-out per token-in before the swap
    pub spot_price: f64,
    /// Token-out per token-in realised by the swap, fee included
    pub execution_price: f64,
    /// Move of the pool price, in percent
    pub price_impact_pct: Decimal,
    pub stop: SwapStop,
    pub result: SwapResult,
}

/// Pools by id plus the engine that quotes against them
#[derive(Debug, Clone, Default)]
pub struct PoolQuoter {
    pools: BTreeMap<String, Pool>,
    engine: SwapEngine,
}

impl PoolQuoter {
    pub fn new(engine: SwapEngine) -> Self {
        Self {
            pools: BTreeMap::new(),
            engine,
        }
    }

    /// Build a quoter, rejecting duplicate pool ids
    pub fn with_pools(
        engine: SwapEngine,
        pools: impl IntoIterator<Item = Pool>,
    ) -> Result<Self, AmmError> {
        let mut quoter = Self::new(engine);
        for pool in pools {
            quoter.insert(pool)?;
        }
        Ok(quoter)
    }

    pub fn insert(&mut self, pool: Pool) -> Result<(), AmmError> {
        if self.pools.contains_key(&pool.id) {
            return Err(AmmError::DuplicatePool { pool_id: pool.id });
        }
        self.pools.insert(pool.id.clone(), pool);
        Ok(())
    }

    pub fn pool(&self, pool_id: &str) -> Option<&Pool> {
        self.pools.get(pool_id)
    }

    /// Pools ordered by id
    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.pools.values()
    }

    pub fn engine(&self) -> &SwapEngine {
        &self.engine
    }

    /// Quote selling `request.amount_in` of `request.token_in`
    ///
    /// A pool without liquidity quotes zero. A walk that hits the iteration
    /// cap is an error: its partial output is not a trade the pool would fill.
    pub fn quote_exact_in(&self, request: &QuoteRequest) -> Result<Quote, AmmError> {
        let pool = self
            .pools
            .get(&request.pool_id)
            .ok_or_else(|| AmmError::UnknownPool {
                pool_id: request.pool_id.clone(),
            })?;

        if !request.amount_in.is_finite() || request.amount_in <= 0.0 {
            return Err(AmmError::InvalidAmount {
                amount: request.amount_in,
            });
        }

        let zero_for_one = match pool.token_index(&request.token_in) {
            Some(0) => true,
            Some(_) => false,
            None => {
                return Err(AmmError::TokenNotInPool {
                    symbol: request.token_in.clone(),
                    pool_id: pool.id.clone(),
                })
            }
        };
        let (token_in, token_out) = if zero_for_one {
            (&pool.token0, &pool.token1)
        } else {
            (&pool.token1, &pool.token0)
        };

        let result = self.engine.simulate(pool, request.amount_in, zero_for_one);
        if result.stop == SwapStop::IterationCap {
            return Err(AmmError::IterationCapReached {
                pool_id: pool.id.clone(),
                max_iterations: self.engine.max_iterations(),
            });
        }

        let amount_out =
            token_out
                .truncate_amount(result.amount_out)
                .ok_or(AmmError::NonRepresentable {
                    amount: result.amount_out,
                    decimals: token_out.decimals,
                })?;

        let price_before = pool.price();
        let price_after = result.new_sqrt_price * result.new_sqrt_price;
        let spot_price = if zero_for_one {
            price_before
        } else {
            1.0 / price_before
        };
        let impact = (price_before - price_after).abs() / price_before * 100.0;
        let price_impact_pct = Decimal::from_f64(impact)
            .map(|d| d.round_dp(PRICE_IMPACT_DP))
            .ok_or(AmmError::NonRepresentable {
                amount: impact,
                decimals: PRICE_IMPACT_DP as u8,
            })?;

        Ok(Quote {
            pool_id: pool.id.clone(),
            token_in: token_in.symbol.clone(),
            token_out: token_out.symbol.clone(),
            amount_in: request.amount_in,
            amount_out,
            spot_price,
            execution_price: result.amount_out / request.amount_in,
            price_impact_pct,
            stop: result.stop,
            result,
        })
    }

    /// Replace a pool with its post-swap snapshot
    ///
    /// Quoting never changes the book; callers that want consecutive quotes
    /// to see each other's price impact apply them explicitly.
    pub fn apply(&mut self, quote: &Quote) -> Result<(), AmmError> {
        let pool = self
            .pools
            .get_mut(&quote.pool_id)
            .ok_or_else(|| AmmError::UnknownPool {
                pool_id: quote.pool_id.clone(),
            })?;
        *pool = pool.apply(&quote.result);
        Ok(())
    }
}
