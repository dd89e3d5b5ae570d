//! Tick, price and sqrt-price conversions
//!
//! `price = 1.0001^tick`, so one tick is one basis point of price. Swap math
//! works in sqrt-price space where a constant-liquidity range is linear:
//! moving from `√a` to `√b` at liquidity `L` moves `L·(1/√a − 1/√b)` of
//! token0 and `L·(√b − √a)` of token1.
//!
//! Every function here is total. Degenerate prices map to the tick bounds
//! instead of panicking or producing out-of-range ticks.

/// Tick bounds shared with on-chain Uniswap V3 pools
pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = 887272;

/// Base of the tick exponential: `price = TICK_BASE^tick`
pub const TICK_BASE: f64 = 1.0001;

/// Distance from an integer below which a raw tick is snapped to it,
/// absorbing `ln`/`powf` rounding so tick → price → tick is exact.
const SNAP_EPSILON: f64 = 1e-9;

/// Greatest tick whose price is ≤ `price`
///
/// Prices ≤ 0 or NaN map to [`MIN_TICK`], `+∞` maps to [`MAX_TICK`].
pub fn price_to_tick(price: f64) -> i32 {
    if price.is_nan() || price <= 0.0 {
        return MIN_TICK;
    }
    if price.is_infinite() {
        return MAX_TICK;
    }

    let raw = price.ln() / TICK_BASE.ln();
    let rounded = raw.round();
    let tick = if (raw - rounded).abs() < SNAP_EPSILON {
        rounded
    } else {
        raw.floor()
    };

    // Clamp in f64 first; `as` would saturate at i32 bounds, not tick bounds
    tick.clamp(f64::from(MIN_TICK), f64::from(MAX_TICK)) as i32
}

pub fn tick_to_price(tick: i32) -> f64 {
    TICK_BASE.powf(f64::from(tick))
}

pub fn tick_to_sqrt_price(tick: i32) -> f64 {
    tick_to_price(tick).sqrt()
}

pub fn price_to_sqrt_price(price: f64) -> f64 {
    price.sqrt()
}

pub fn sqrt_price_to_price(sqrt_price: f64) -> f64 {
    sqrt_price * sqrt_price
}

/// Tick at a sqrt-price, equivalent to `price_to_tick(sqrt_price²)`
pub fn sqrt_price_to_tick(sqrt_price: f64) -> i32 {
    price_to_tick(sqrt_price_to_price(sqrt_price))
}

/// Align `tick` to the nearest multiple of `spacing` at or below it
///
/// Floors toward negative infinity: `round_to_spacing(-1, 60) == -60`.
/// A non-positive spacing leaves the tick unchanged.
pub fn round_to_spacing(tick: i32, spacing: i32) -> i32 {
    if spacing <= 0 {
        return tick;
    }
    tick.div_euclid(spacing) * spacing
}

/// Token0 moved when price travels between `sqrt_a` and `sqrt_b` at constant `liquidity`
pub fn dx_from_to(liquidity: f64, sqrt_a: f64, sqrt_b: f64) -> f64 {
    liquidity * (1.0 / sqrt_a - 1.0 / sqrt_b)
}

/// Token1 moved when price travels between `sqrt_a` and `sqrt_b` at constant `liquidity`
pub fn dy_from_to(liquidity: f64, sqrt_a: f64, sqrt_b: f64) -> f64 {
    liquidity * (sqrt_b - sqrt_a)
}
