//! # Optimal Range Prediction
//!
//! Heuristic liquidity range for a new position: a price band around the
//! current price that widens with volatility, aligned outward to the tick
//! spacing, plus the confidence, APR and risk figures shown next to it.

use super::tick_math::{
    align_to_tick_spacing, is_tick_valid, price_range_to_ticks, price_to_tick, TickRange,
};
use crate::constants::{BASE_RANGE_APR, DEEP_LIQUIDITY, RANGE_BUFFER_PER_VOLATILITY};
use crate::errors::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalRange {
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub lower_price: f64,
    pub upper_price: f64,
    pub confidence: f64,
    pub expected_apr: f64,
    pub risk_score: f64,
    pub reasoning: String,
}

/// Predict a range for liquidity provided at `current_price`.
///
/// Volatility above 1.0 is treated as 1.0. With zero volatility the range is
/// the single spacing interval holding the current tick.
pub fn predict_optimal_range(
    current_price: f64,
    volume_24h: f64,
    volatility: f64,
    liquidity: f64,
    tick_spacing: i32,
) -> CoreResult<OptimalRange> {
    for (name, value) in [
        ("volume_24h", volume_24h),
        ("volatility", volatility),
        ("liquidity", liquidity),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::invalid_argument(name, value, "a finite, non-negative number"));
        }
    }

    let current_tick = price_to_tick(current_price)?.round();
    if !(i32::MIN as f64..=i32::MAX as f64).contains(&current_tick) || !is_tick_valid(current_tick as i32) {
        return Err(CoreError::invalid_argument(
            "current_price",
            current_price,
            "a price whose tick lies within [MIN_TICK, MAX_TICK]",
        ));
    }

    let volatility_factor = volatility.min(1.0);
    let buffer = volatility_factor * RANGE_BUFFER_PER_VOLATILITY;
    let range = if buffer > 0.0 {
        price_range_to_ticks(current_price * (1.0 - buffer), current_price * (1.0 + buffer), tick_spacing)?
    } else {
        let lower_tick = align_to_tick_spacing(current_tick as i32, tick_spacing)?;
        let upper_tick = lower_tick
            .checked_add(tick_spacing)
            .filter(|tick| is_tick_valid(*tick))
            .ok_or_else(|| {
                CoreError::invalid_argument("tick_spacing", tick_spacing, "a spacing that fits above the current tick")
            })?;
        TickRange {
            lower_tick,
            upper_tick,
        }
    };

    let confidence = 0.85 - volatility_factor * 0.2;
    let expected_apr = BASE_RANGE_APR + (volume_24h / 1_000_000.0) * 0.05;
    let risk_score = volatility_factor * 0.6 + (1.0 - (liquidity / DEEP_LIQUIDITY).min(1.0)) * 0.4;

    Ok(OptimalRange {
        lower_tick: range.lower_tick,
        upper_tick: range.upper_tick,
        lower_price: range.lower_price(),
        upper_price: range.upper_price(),
        confidence,
        expected_apr,
        risk_score,
        reasoning: format!(
            "Range sized for {:.1}% volatility with {:.1}% confidence and an estimated {:.1}% APR",
            volatility * 100.0,
            confidence * 100.0,
            expected_apr * 100.0
        ),
    })
}
