//! Tick Math and Swap Property Tests
//!
//! Mathematical properties that must hold for any tick, any generated pool
//! and any positive swap size, independent of specific market parameters.

use proptest::prelude::*;
use quote_amm::tick_math::{dx_from_to, dy_from_to, price_to_tick, tick_to_price, tick_to_sqrt_price};
use quote_amm::{make_v3_pool, simulate_swap, Pool, PoolParams, SwapStop, MAX_TICK, MIN_TICK};
use quote_types::TokenRegistry;

fn generated_pool(mid_price: f64, fee: f64, tick_spacing: i32) -> Pool {
    let registry = TokenRegistry::with_defaults();
    make_v3_pool(&PoolParams {
        id: "WBTC-DAI".to_string(),
        token0: registry.resolve("WBTC").unwrap().clone(),
        token1: registry.resolve("DAI").unwrap().clone(),
        mid_price,
        fee,
        tick_spacing,
        volume_24h_usd: 0.0,
    })
}

// Property test strategies
prop_compose! {
    fn mid_prices()(exponent in -6.0f64..6.0) -> f64 {
        10f64.powf(exponent)
    }
}

fn fee_tiers() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0001), Just(0.0005), Just(0.003), Just(0.01)]
}

fn tick_spacings() -> impl Strategy<Value = i32> {
    prop_oneof![Just(1), Just(10), Just(60), Just(200)]
}

proptest! {
    #[test]
    fn prop_tick_price_round_trip(tick in MIN_TICK..=MAX_TICK) {
        prop_assert_eq!(price_to_tick(tick_to_price(tick)), tick);
    }

    #[test]
    fn prop_sqrt_price_squares_to_price(tick in -400_000i32..400_000) {
        let sqrt_price = tick_to_sqrt_price(tick);
        let price = tick_to_price(tick);
        prop_assert!((sqrt_price * sqrt_price - price).abs() <= price * 1e-12);
    }

    #[test]
    fn prop_generated_pools_net_to_zero(
        mid_price in mid_prices(),
        fee in fee_tiers(),
        tick_spacing in tick_spacings(),
    ) {
        let pool = generated_pool(mid_price, fee, tick_spacing);
        prop_assert_eq!(pool.net_liquidity(), 0.0);
        prop_assert!(pool.ticks.iter().all(|t| t.index % tick_spacing == 0));
        prop_assert!(pool.liquidity > 0.0);
        prop_assert!(pool.check_invariants().is_ok());
    }

    #[test]
    fn prop_selling_token0_never_raises_price(
        mid_price in mid_prices(),
        fee in fee_tiers(),
        fraction in 1e-6f64..10.0,
    ) {
        let pool = generated_pool(mid_price, fee, 60);
        // Scale the input to the pool so both shallow and exhausting swaps occur
        let amount_in = fraction * pool.liquidity / pool.sqrt_price / 100.0;
        let result = simulate_swap(&pool, amount_in, true);

        prop_assert!(result.new_sqrt_price <= pool.sqrt_price);
        prop_assert!(result.new_tick <= pool.tick_current);
        prop_assert!(result.amount_out >= 0.0);
    }

    #[test]
    fn prop_selling_token1_never_lowers_price(
        mid_price in mid_prices(),
        fee in fee_tiers(),
        fraction in 1e-6f64..10.0,
    ) {
        let pool = generated_pool(mid_price, fee, 60);
        let amount_in = fraction * pool.liquidity * pool.sqrt_price / 100.0;
        let result = simulate_swap(&pool, amount_in, false);

        prop_assert!(result.new_sqrt_price >= pool.sqrt_price);
        prop_assert!(result.new_tick >= pool.tick_current);
        prop_assert!(result.amount_out >= 0.0);
    }

    #[test]
    fn prop_single_range_swap_conserves_liquidity(
        mid_price in mid_prices(),
        fee in fee_tiers(),
        fraction in 1e-4f64..1e-2,
        zero_for_one in any::<bool>(),
    ) {
        let pool = generated_pool(mid_price, fee, 60);
        let amount_in = if zero_for_one {
            fraction * pool.liquidity / pool.sqrt_price / 100.0
        } else {
            fraction * pool.liquidity * pool.sqrt_price / 100.0
        };
        let result = simulate_swap(&pool, amount_in, zero_for_one);
        prop_assume!(result.ticks_crossed == 0 && result.stop == SwapStop::Filled);

        // Recover L from how far the consumed input moved the price
        let unit_move = if zero_for_one {
            dx_from_to(1.0, result.new_sqrt_price, pool.sqrt_price)
        } else {
            dy_from_to(1.0, pool.sqrt_price, result.new_sqrt_price)
        };
        let implied = result.amount_in_consumed / unit_move;
        prop_assert!(
            (implied - pool.liquidity).abs() <= pool.liquidity * 1e-6,
            "implied {} vs stated {}", implied, pool.liquidity
        );
    }

    #[test]
    fn prop_output_grows_with_input(
        mid_price in mid_prices(),
        fraction in 1e-5f64..1.0,
    ) {
        let pool = generated_pool(mid_price, 0.003, 60);
        let amount_in = fraction * pool.liquidity / pool.sqrt_price / 100.0;
        let small = simulate_swap(&pool, amount_in, true);
        let large = simulate_swap(&pool, amount_in * 2.0, true);
        prop_assert!(large.amount_out >= small.amount_out);
    }
}
