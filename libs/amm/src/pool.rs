//! Concentrated-liquidity pool snapshot
//!
//! A [`Pool`] is a read-only value: the swap engine reads it and returns a
//! [`SwapResult`]; [`Pool::apply`] builds the next snapshot when a caller
//! wants to chain swaps.
//!
//! The tick list is a sparse ordered map from boundary index to signed
//! liquidity delta, stored as a sorted `Vec` so lookups are binary searches.

use std::collections::BTreeMap;

use quote_types::{Token, TokenRegistry};
use serde::{Deserialize, Serialize};

use crate::error::{AmmError, PoolError};
use crate::swap::SwapResult;
use crate::tick_math::{price_to_sqrt_price, price_to_tick, sqrt_price_to_tick, tick_to_sqrt_price};

/// Relative tolerance used when checking float invariants
const INVARIANT_TOLERANCE: f64 = 1e-9;

/// Liquidity at or below this fraction of the gross tick liquidity is
/// rounding residue from summing `liquidity_net` values, and counts as zero
pub const LIQUIDITY_DUST: f64 = 1e-12;

/// Initialized tick boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub index: i32,
    /// Cached `tick_to_sqrt_price(index)`
    pub sqrt_price: f64,
    /// Added to active liquidity when price crosses upward, subtracted downward
    pub liquidity_net: f64,
}

impl Tick {
    pub fn new(index: i32, liquidity_net: f64) -> Self {
        Self {
            index,
            sqrt_price: tick_to_sqrt_price(index),
            liquidity_net,
        }
    }
}

/// Identity and market parameters of a pool, independent of its liquidity layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolParams {
    pub id: String,
    pub token0: Token,
    pub token1: Token,
    /// Reference price of token0 in token1
    pub mid_price: f64,
    /// Fraction of input kept by the pool, e.g. 0.003
    pub fee: f64,
    pub tick_spacing: i32,
    /// Display only
    pub volume_24h_usd: f64,
}

impl PoolParams {
    /// Resolve the pair's symbols against `registry`; volume starts at zero
    pub fn from_symbols(
        registry: &TokenRegistry,
        id: impl Into<String>,
        token0: &str,
        token1: &str,
        mid_price: f64,
        fee: f64,
        tick_spacing: i32,
    ) -> Result<Self, AmmError> {
        Ok(Self {
            id: id.into(),
            token0: registry.resolve(token0)?.clone(),
            token1: registry.resolve(token1)?.clone(),
            mid_price,
            fee,
            tick_spacing,
            volume_24h_usd: 0.0,
        })
    }
}

/// Pool state with concentrated liquidity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    pub token0: Token,
    pub token1: Token,
    pub fee: f64,
    pub tick_spacing: i32,
    pub sqrt_price: f64,
    pub tick_current: i32,
    /// Active virtual liquidity L
    pub liquidity: f64,
    /// Ascending by index, one entry per index
    pub ticks: Vec<Tick>,
    pub volume_24h_usd: f64,
}

impl Pool {
    /// Build a pool from an arbitrary tick layout
    ///
    /// Duplicate indices are merged and zero deltas dropped. The current tick
    /// and active liquidity are derived from `params.mid_price`; a degenerate
    /// mid price pins the pool to the nearest tick bound.
    pub fn from_ticks(params: &PoolParams, ticks: impl IntoIterator<Item = (i32, f64)>) -> Self {
        let mut merged: BTreeMap<i32, f64> = BTreeMap::new();
        for (index, liquidity_net) in ticks {
            *merged.entry(index).or_insert(0.0) += liquidity_net;
        }

        let ticks: Vec<Tick> = merged
            .into_iter()
            .filter(|(_, net)| *net != 0.0)
            .map(|(index, net)| Tick::new(index, net))
            .collect();

        let tick_current = price_to_tick(params.mid_price);
        let sqrt_price = if params.mid_price.is_finite() && params.mid_price > 0.0 {
            price_to_sqrt_price(params.mid_price)
        } else {
            tick_to_sqrt_price(tick_current)
        };

        let mut pool = Self {
            id: params.id.clone(),
            token0: params.token0.clone(),
            token1: params.token1.clone(),
            fee: params.fee,
            tick_spacing: params.tick_spacing,
            sqrt_price,
            tick_current,
            liquidity: 0.0,
            ticks,
            volume_24h_usd: params.volume_24h_usd,
        };
        pool.liquidity = pool.active_liquidity_at(tick_current);
        pool
    }

    /// Price of token0 in token1
    pub fn price(&self) -> f64 {
        self.sqrt_price * self.sqrt_price
    }

    /// Sum of `liquidity_net` over ticks with `index ≤ tick`
    pub fn active_liquidity_at(&self, tick: i32) -> f64 {
        let sum = self
            .ticks
            .iter()
            .take_while(|t| t.index <= tick)
            .map(|t| t.liquidity_net)
            .sum();
        self.snap_dust(sum)
    }

    /// Sum of `liquidity_net` over all ticks; zero for a balanced layout
    pub fn net_liquidity(&self) -> f64 {
        self.snap_dust(self.ticks.iter().map(|t| t.liquidity_net).sum())
    }

    /// Sum of `|liquidity_net|` over all ticks
    pub fn gross_liquidity(&self) -> f64 {
        self.ticks.iter().map(|t| t.liquidity_net.abs()).sum()
    }

    /// Magnitude below which a running liquidity sum is treated as zero
    pub fn dust_threshold(&self) -> f64 {
        LIQUIDITY_DUST * self.gross_liquidity()
    }

    fn snap_dust(&self, liquidity: f64) -> f64 {
        if liquidity.abs() <= self.dust_threshold() {
            0.0
        } else {
            liquidity
        }
    }

    /// First initialized tick strictly above `tick`
    pub fn next_tick_above(&self, tick: i32) -> Option<&Tick> {
        let idx = self.ticks.partition_point(|t| t.index <= tick);
        self.ticks.get(idx)
    }

    /// Last initialized tick at or below `tick`
    pub fn next_tick_at_or_below(&self, tick: i32) -> Option<&Tick> {
        let idx = self.ticks.partition_point(|t| t.index <= tick);
        idx.checked_sub(1).and_then(|i| self.ticks.get(i))
    }

    /// 0 for token0, 1 for token1, `None` if the symbol is not in the pair
    pub fn token_index(&self, symbol: &str) -> Option<usize> {
        if self.token0.has_symbol(symbol) {
            Some(0)
        } else if self.token1.has_symbol(symbol) {
            Some(1)
        } else {
            None
        }
    }

    /// Snapshot after `result`, leaving `self` untouched
    pub fn apply(&self, result: &SwapResult) -> Self {
        Self {
            sqrt_price: result.new_sqrt_price,
            tick_current: result.new_tick,
            liquidity: result.new_liquidity,
            ..self.clone()
        }
    }

    /// Report the first violated structural invariant
    ///
    /// The swap walk relies on every range contributing a matched +L/−L
    /// pair; a hand-built layout without that symmetry is rejected here.
    pub fn check_invariants(&self) -> Result<(), PoolError> {
        for (position, pair) in self.ticks.windows(2).enumerate() {
            if pair[0].index >= pair[1].index {
                return Err(PoolError::UnsortedTicks {
                    position: position + 1,
                    previous: pair[0].index,
                    next: pair[1].index,
                });
            }
        }

        let gross = self.gross_liquidity();
        let net = self.net_liquidity();
        if !approx_eq(net, 0.0, gross) {
            return Err(PoolError::UnbalancedLiquidityNet { net });
        }

        let computed = self.active_liquidity_at(self.tick_current);
        if !approx_eq(self.liquidity, computed, gross) {
            return Err(PoolError::ActiveLiquidityMismatch {
                stored: self.liquidity,
                computed,
                tick: self.tick_current,
            });
        }

        // A downward crossing parks the price on (or a rounding hair below) the
        // boundary with the tick just below it
        let derived_tick = sqrt_price_to_tick(self.sqrt_price);
        let parked_on_boundary = self.tick_current == derived_tick - 1
            && approx_eq(self.sqrt_price, tick_to_sqrt_price(derived_tick), self.sqrt_price);
        if derived_tick != self.tick_current && !parked_on_boundary {
            return Err(PoolError::TickPriceMismatch {
                stored: self.tick_current,
                computed: derived_tick,
                sqrt_price: self.sqrt_price,
            });
        }

        Ok(())
    }
}

fn approx_eq(a: f64, b: f64, scale: f64) -> bool {
    (a - b).abs() <= INVARIANT_TOLERANCE * scale.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_types::TokenRegistry;

    fn params(mid_price: f64) -> PoolParams {
        let registry = TokenRegistry::with_defaults();
        PoolParams {
            id: "WETH-USDC".to_string(),
            token0: registry.resolve("WETH").unwrap().clone(),
            token1: registry.resolve("USDC").unwrap().clone(),
            mid_price,
            fee: 0.003,
            tick_spacing: 10,
            volume_24h_usd: 0.0,
        }
    }

    #[test]
    fn test_from_ticks_merges_and_sorts() {
        let pool = Pool::from_ticks(
            &params(1.0),
            vec![(100, -5.0), (-100, 5.0), (-100, 2.0), (50, -2.0), (70, 0.0)],
        );

        let indices: Vec<i32> = pool.ticks.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![-100, 50, 100]);
        assert_eq!(pool.ticks[0].liquidity_net, 7.0);
        assert_eq!(pool.tick_current, 0);
        assert_eq!(pool.liquidity, 7.0);
        assert!(pool.check_invariants().is_ok());
    }

    #[test]
    fn test_neighbour_lookup() {
        let pool = Pool::from_ticks(&params(1.0), vec![(-100, 1.0), (0, 1.0), (100, -2.0)]);

        assert_eq!(pool.next_tick_above(0).map(|t| t.index), Some(100));
        assert_eq!(pool.next_tick_above(-100).map(|t| t.index), Some(0));
        assert_eq!(pool.next_tick_above(100), None);

        assert_eq!(pool.next_tick_at_or_below(0).map(|t| t.index), Some(0));
        assert_eq!(pool.next_tick_at_or_below(-1).map(|t| t.index), Some(-100));
        assert_eq!(pool.next_tick_at_or_below(-101), None);
    }

    #[test]
    fn test_unbalanced_layout_detected() {
        let pool = Pool::from_ticks(&params(1.0), vec![(-100, 10.0), (100, -4.0)]);
        assert!(matches!(
            pool.check_invariants(),
            Err(PoolError::UnbalancedLiquidityNet { .. })
        ));
    }

    #[test]
    fn test_tampered_state_detected() {
        let mut pool = Pool::from_ticks(&params(1.0), vec![(-100, 10.0), (100, -10.0)]);
        pool.liquidity = 3.0;
        assert!(matches!(
            pool.check_invariants(),
            Err(PoolError::ActiveLiquidityMismatch { .. })
        ));

        let mut pool = Pool::from_ticks(&params(1.0), vec![(-100, 10.0), (100, -10.0)]);
        pool.tick_current = 42;
        pool.liquidity = pool.active_liquidity_at(42);
        assert!(matches!(
            pool.check_invariants(),
            Err(PoolError::TickPriceMismatch { stored: 42, computed: 0, .. })
        ));

        let mut pool = Pool::from_ticks(&params(1.0), vec![(-100, 10.0), (100, -10.0)]);
        pool.ticks.swap(0, 1);
        assert!(matches!(
            pool.check_invariants(),
            Err(PoolError::UnsortedTicks { .. })
        ));
    }

    #[test]
    fn test_degenerate_mid_price_is_total() {
        let pool = Pool::from_ticks(&params(-1.0), vec![(-100, 10.0), (100, -10.0)]);
        assert_eq!(pool.tick_current, crate::tick_math::MIN_TICK);
        assert!(pool.sqrt_price > 0.0);
        assert_eq!(pool.liquidity, 0.0);
    }

    #[test]
    fn test_params_from_symbols() {
        let registry = TokenRegistry::with_defaults();
        let params =
            PoolParams::from_symbols(&registry, "WBTC-USDC", "wbtc", "usdc", 60_000.0, 0.003, 60)
                .unwrap();
        assert_eq!(params.token0.decimals, 8);
        assert_eq!(params.token1.symbol, "USDC");

        let err = PoolParams::from_symbols(&registry, "X", "WBTC", "PEPE", 1.0, 0.003, 60)
            .unwrap_err();
        assert!(matches!(err, AmmError::Token(_)));
        assert_eq!(err.to_string(), "Unknown token symbol 'PEPE'");
    }

    #[test]
    fn test_token_index() {
        let pool = Pool::from_ticks(&params(1.0), Vec::new());
        assert_eq!(pool.token_index("weth"), Some(0));
        assert_eq!(pool.token_index("USDC"), Some(1));
        assert_eq!(pool.token_index("DAI"), None);
    }
}
