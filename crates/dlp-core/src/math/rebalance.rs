//! # Rebalance Recommendation
//!
//! Utilization-driven advice on whether a position should be re-centred and
//! how far its range should narrow.

use super::gas::GasOperation;
use super::tick_math::{align_to_tick_spacing, align_up_to_tick_spacing, is_tick_valid, narrow_tick};
use crate::constants::{MAX_TICK, MIN_TICK, OPTIMAL_UTILIZATION, REBALANCE_REQUIRED_BELOW, REBALANCE_SUGGESTED_BELOW};
use crate::errors::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceAction {
    RebalanceRequired,
    RebalanceSuggested,
    HoldPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Short operator-facing reading of the urgency
    pub fn assessment(&self) -> &'static str {
        match self {
            Urgency::High => "High opportunity cost - immediate rebalancing recommended",
            Urgency::Medium => "Moderate inefficiency - rebalancing beneficial",
            Urgency::Low => "Position optimal - no immediate action required",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceRecommendation {
    pub action: RebalanceAction,
    pub urgency: Urgency,
    pub new_lower_tick: i32,
    pub new_upper_tick: i32,
    /// Expected gain in percentage points of utilization-weighted yield
    pub expected_improvement: f64,
    pub risk_assessment: String,
    pub gas_cost_estimate: f64,
}

/// Recommend a rebalance for a position in `[lower_tick, upper_tick)`.
///
/// All ticks must lie in `[MIN_TICK, MAX_TICK]`. A recommended range is
/// re-centred on `current_tick` and clamped to the aligned tick domain.
pub fn analyze_rebalance(
    current_tick: i32,
    lower_tick: i32,
    upper_tick: i32,
    utilization_rate: f64,
    tick_spacing: i32,
) -> CoreResult<RebalanceRecommendation> {
    for (name, tick) in [
        ("current_tick", current_tick),
        ("lower_tick", lower_tick),
        ("upper_tick", upper_tick),
    ] {
        if !is_tick_valid(tick) {
            return Err(CoreError::invalid_argument(name, tick, "within [MIN_TICK, MAX_TICK]"));
        }
    }
    if lower_tick >= upper_tick {
        return Err(CoreError::invalid_argument(
            "lower_tick",
            lower_tick,
            "strictly less than upper_tick",
        ));
    }
    if !(0.0..=1.0).contains(&utilization_rate) {
        return Err(CoreError::invalid_argument("utilization_rate", utilization_rate, "within [0, 1]"));
    }
    if tick_spacing <= 0 {
        return Err(CoreError::invalid_argument("tick_spacing", tick_spacing, "greater than 0"));
    }

    let (action, urgency, improvement, narrowing) = if utilization_rate < REBALANCE_REQUIRED_BELOW {
        (
            RebalanceAction::RebalanceRequired,
            Urgency::High,
            (OPTIMAL_UTILIZATION - utilization_rate) * 100.0,
            Some(0.7),
        )
    } else if utilization_rate < REBALANCE_SUGGESTED_BELOW {
        (
            RebalanceAction::RebalanceSuggested,
            Urgency::Medium,
            (OPTIMAL_UTILIZATION - utilization_rate) * 60.0,
            Some(0.85),
        )
    } else {
        (RebalanceAction::HoldPosition, Urgency::Low, 0.0, None)
    };

    let (new_lower_tick, new_upper_tick) = match narrowing {
        Some(factor) => recentre(current_tick, lower_tick, upper_tick, factor, tick_spacing)?,
        None => (lower_tick, upper_tick),
    };

    Ok(RebalanceRecommendation {
        action,
        urgency,
        new_lower_tick,
        new_upper_tick,
        expected_improvement: improvement,
        risk_assessment: urgency.assessment().to_string(),
        gas_cost_estimate: GasOperation::Rebalance.cost(),
    })
}

/// Narrow `[lower, upper)` by `factor` around `current`, aligned and kept
/// inside the aligned tick domain.
fn recentre(current: i32, lower: i32, upper: i32, factor: f64, spacing: i32) -> CoreResult<(i32, i32)> {
    let floor_bound = align_up_to_tick_spacing(MIN_TICK, spacing)? as i64;
    let ceil_bound = align_to_tick_spacing(MAX_TICK, spacing)? as i64;
    let spacing = spacing as i64;
    if ceil_bound - floor_bound < spacing {
        return Err(CoreError::invalid_argument(
            "tick_spacing",
            spacing,
            "small enough to fit one range inside [MIN_TICK, MAX_TICK]",
        ));
    }

    let width = ((upper as i64 - lower as i64) as f64 * factor) as i64;
    let half = width / 2;
    let current = current as i64;

    let mut new_lower = (current - half).div_euclid(spacing) * spacing;
    let mut new_upper = (current + half).div_euclid(spacing) * spacing;
    new_lower = new_lower.clamp(floor_bound, ceil_bound);
    new_upper = new_upper.clamp(floor_bound, ceil_bound);
    if new_upper <= new_lower {
        new_upper = new_lower + spacing;
        if new_upper > ceil_bound {
            new_upper = ceil_bound;
            new_lower = ceil_bound - spacing;
        }
    }

    Ok((narrow_tick(new_lower)?, narrow_tick(new_upper)?))
}
