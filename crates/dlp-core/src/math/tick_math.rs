//! # Tick Math
//!
//! Floating-point conversions between ticks and prices (`price = 1.0001^tick`)
//! for display and range recommendations. These mirror the AMM formula
//! client-side and are not a substitute for on-chain Q64 math.

use crate::constants::{MAX_TICK, MIN_TICK, TICK_BASE};
use crate::errors::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Price at a tick. `tick_to_price(0) == 1.0` exactly.
pub fn tick_to_price(tick: i32) -> f64 {
    TICK_BASE.powf(tick as f64)
}

/// Fractional tick at a price; round it to get the nearest tick.
pub fn price_to_tick(price: f64) -> CoreResult<f64> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CoreError::domain(
            "price_to_tick",
            format!("logarithm undefined for price {}", price),
        ));
    }

    Ok(price.ln() / TICK_BASE.ln())
}

/// Round a tick down to a multiple of `spacing`.
///
/// Floors toward negative infinity, so `-105` with spacing `10` becomes
/// `-110`. Range construction relies on lower bounds never moving up.
pub fn align_to_tick_spacing(tick: i32, spacing: i32) -> CoreResult<i32> {
    validate_spacing(spacing)?;
    let aligned = (tick as i64).div_euclid(spacing as i64) * spacing as i64;
    narrow_tick(aligned)
}

/// Round a tick up to a multiple of `spacing`.
pub fn align_up_to_tick_spacing(tick: i32, spacing: i32) -> CoreResult<i32> {
    validate_spacing(spacing)?;
    let aligned = -(-(tick as i64)).div_euclid(spacing as i64) * spacing as i64;
    narrow_tick(aligned)
}

/// Check if a tick is within the supported range
pub fn is_tick_valid(tick: i32) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick)
}

/// An aligned `[lower, upper)` tick interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickRange {
    pub lower_tick: i32,
    pub upper_tick: i32,
}

impl TickRange {
    pub fn width(&self) -> i32 {
        self.upper_tick - self.lower_tick
    }

    pub fn lower_price(&self) -> f64 {
        tick_to_price(self.lower_tick)
    }

    pub fn upper_price(&self) -> f64 {
        tick_to_price(self.upper_tick)
    }

    pub fn contains(&self, tick: i32) -> bool {
        tick >= self.lower_tick && tick < self.upper_tick
    }
}

/// Convert a price band into an aligned tick range at least as wide as the band.
pub fn price_range_to_ticks(lower_price: f64, upper_price: f64, spacing: i32) -> CoreResult<TickRange> {
    validate_spacing(spacing)?;
    let lower = price_to_tick(lower_price)?;
    let upper = price_to_tick(upper_price)?;
    if lower_price >= upper_price {
        return Err(CoreError::invalid_argument(
            "lower_price",
            lower_price,
            "strictly less than upper_price",
        ));
    }

    let lower_tick = align_to_tick_spacing(float_tick(lower.floor())?, spacing)?;
    let mut upper_tick = align_up_to_tick_spacing(float_tick(upper.ceil())?, spacing)?;
    if upper_tick <= lower_tick {
        upper_tick = lower_tick + spacing;
    }

    if !is_tick_valid(lower_tick) || !is_tick_valid(upper_tick) {
        return Err(CoreError::invalid_argument(
            "price_range",
            format!("[{}, {}]", lower_price, upper_price),
            "prices whose aligned ticks lie within [MIN_TICK, MAX_TICK]",
        ));
    }

    Ok(TickRange {
        lower_tick,
        upper_tick,
    })
}

fn validate_spacing(spacing: i32) -> CoreResult<()> {
    if spacing <= 0 {
        return Err(CoreError::invalid_argument("tick_spacing", spacing, "greater than 0"));
    }
    Ok(())
}

pub(crate) fn narrow_tick(tick: i64) -> CoreResult<i32> {
    i32::try_from(tick).map_err(|_| CoreError::invalid_argument("tick", tick, "a value representable as i32"))
}

fn float_tick(tick: f64) -> CoreResult<i32> {
    if tick < i32::MIN as f64 || tick > i32::MAX as f64 {
        return Err(CoreError::invalid_argument("tick", tick, "a value representable as i32"));
    }
    Ok(tick as i32)
}
