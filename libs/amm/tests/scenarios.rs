//! End-to-end swap and liquidity scenarios against generated pools
//!
//! Uses the default token registry and the three-range generator shape, the
//! same setup the fallback quoter serves from.

use approx::assert_relative_eq;
use quote_amm::{
    amounts_from_liquidity, liquidity_from_amounts, make_v3_pool, simulate_swap, tick_to_sqrt_price,
    Pool, PoolParams, SwapStop,
};
use quote_types::TokenRegistry;

fn weth_usdc(mid_price: f64, fee: f64, tick_spacing: i32) -> PoolParams {
    let registry = TokenRegistry::with_defaults();
    PoolParams {
        id: "WETH-USDC".to_string(),
        token0: registry.resolve("WETH").unwrap().clone(),
        token1: registry.resolve("USDC").unwrap().clone(),
        mid_price,
        fee,
        tick_spacing,
        volume_24h_usd: 12_500_000.0,
    }
}

#[test]
fn test_sell_token0_into_generated_pool() {
    let pool = make_v3_pool(&weth_usdc(3000.0, 0.003, 60));
    assert!(pool.check_invariants().is_ok());

    let result = simulate_swap(&pool, 10.0, true);

    assert_eq!(result.stop, SwapStop::Filled);
    assert!(result.amount_out > 0.0);
    assert!(result.new_sqrt_price < pool.sqrt_price);
    assert!(result.new_tick <= pool.tick_current);
    // Ten WETH at roughly 3000 less the 0.3% fee
    assert!(result.amount_out > 29_000.0 && result.amount_out < 29_910.0);
}

#[test]
fn test_amount_liquidity_round_trip_at_range_midpoint() {
    let sqrt_a = tick_to_sqrt_price(79_440);
    let sqrt_b = tick_to_sqrt_price(80_640);
    let sqrt_price = (sqrt_a + sqrt_b) / 2.0;

    let (amount0, amount1) = amounts_from_liquidity(sqrt_price, sqrt_a, sqrt_b, 1_000_000.0);
    assert!(amount0 > 0.0 && amount1 > 0.0);

    let liquidity = liquidity_from_amounts(sqrt_price, sqrt_a, sqrt_b, amount0, amount1);
    assert_relative_eq!(liquidity, 1_000_000.0, max_relative = 1e-9);

    let (again0, again1) = amounts_from_liquidity(sqrt_price, sqrt_a, sqrt_b, liquidity);
    assert_relative_eq!(again0, amount0, max_relative = 1e-9);
    assert_relative_eq!(again1, amount1, max_relative = 1e-9);
}

#[test]
fn test_empty_pool_returns_input_state() {
    let pool = Pool::from_ticks(&weth_usdc(3000.0, 0.003, 60), Vec::new());
    assert_eq!(pool.liquidity, 0.0);

    for zero_for_one in [true, false] {
        let result = simulate_swap(&pool, 10.0, zero_for_one);
        assert_eq!(result.amount_out, 0.0);
        assert_eq!(result.new_sqrt_price, pool.sqrt_price);
        assert_eq!(result.new_tick, pool.tick_current);
        assert_eq!(result.stop, SwapStop::NoLiquidity);
    }
}

#[test]
fn test_oversized_swap_stops_at_outermost_range() {
    let pool = make_v3_pool(&weth_usdc(3000.0, 0.003, 60));
    let lowest = pool.ticks.first().unwrap().index;
    let highest = pool.ticks.last().unwrap().index;

    let down = simulate_swap(&pool, 1e9, true);
    assert_eq!(down.stop, SwapStop::LiquidityExhausted);
    assert_eq!(down.new_liquidity, 0.0);
    assert_eq!(down.new_tick, lowest - 1);
    assert_eq!(down.ticks_crossed, 3);

    let up = simulate_swap(&pool, 1e12, false);
    assert_eq!(up.stop, SwapStop::LiquidityExhausted);
    assert_eq!(up.new_tick, highest);
    assert!(up.amount_in_consumed < 1e12);
}

#[test]
fn test_chained_swaps_keep_pool_consistent() {
    let mut pool = make_v3_pool(&weth_usdc(3000.0, 0.003, 60));
    let start_price = pool.price();

    // Push the price down through a couple of boundaries, then back up
    for (amount, zero_for_one) in [(400.0, true), (800.0, true), (1_500_000.0, false), (2.5, true)] {
        let result = simulate_swap(&pool, amount, zero_for_one);
        assert!(result.is_complete());
        assert_eq!(result.new_liquidity, pool.active_liquidity_at(result.new_tick));

        pool = pool.apply(&result);
        assert!(pool.check_invariants().is_ok(), "after {amount} {zero_for_one}");
    }

    assert!(pool.price() != start_price);
}

#[test]
fn test_round_trip_costs_fees() {
    let pool = make_v3_pool(&weth_usdc(3000.0, 0.003, 60));

    let sold = simulate_swap(&pool, 5.0, true);
    let bought_back = simulate_swap(&pool.apply(&sold), sold.amount_out, false);

    assert!(bought_back.amount_out < 5.0);
    assert!(bought_back.amount_out > 5.0 * 0.99);
}

#[test]
fn test_fee_free_pool_matches_curve() {
    let pool = make_v3_pool(&weth_usdc(1.0, 0.0, 10));
    let result = simulate_swap(&pool, 100.0, false);

    // Without a fee every unit of input moves the price
    assert_eq!(result.amount_in_consumed, 100.0);
    assert_relative_eq!(
        result.new_sqrt_price,
        pool.sqrt_price + 100.0 / pool.liquidity,
        max_relative = 1e-12
    );
}
