//! # Protocol Constants
//!
//! - Tick domain bounds and the tick base
//! - Estimator defaults (gas costs, rebalance thresholds)
//! - Store limits and risk thresholds

// ============================================================================
// Tick Domain
// ============================================================================

/// Minimum usable tick (mirrors the 128-bit fixed-point price domain)
pub const MIN_TICK: i32 = -887_220;

/// Maximum usable tick
pub const MAX_TICK: i32 = 887_220;

/// Price ratio between two adjacent ticks
pub const TICK_BASE: f64 = 1.0001;

/// Default tick spacing for concentrated liquidity pools on SEI
pub const DEFAULT_TICK_SPACING: i32 = 60;

// ============================================================================
// Estimators
// ============================================================================

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Gas cost (native units) for operations missing from the lookup table
pub const DEFAULT_GAS_COST: f64 = 0.002;

/// Utilization a well-placed position is expected to reach
pub const OPTIMAL_UTILIZATION: f64 = 0.75;

/// Below this utilization a rebalance is required
pub const REBALANCE_REQUIRED_BELOW: f64 = 0.3;

/// Below this utilization a rebalance is suggested
pub const REBALANCE_SUGGESTED_BELOW: f64 = 0.6;

// ============================================================================
// Risk Assessment
// ============================================================================

/// Volatility at which the volatility component saturates
pub const MAX_VOLATILITY: f64 = 0.8;

/// Position share of the pool at which concentration risk saturates
pub const MAX_CONCENTRATION: f64 = 0.7;

/// Liquidity (USD) below which a pool is considered shallow
pub const MIN_LIQUIDITY_DEPTH: f64 = 10_000.0;

/// Component weights: impermanent loss, volatility, liquidity, concentration
pub const RISK_WEIGHTS: [f64; 4] = [0.3, 0.25, 0.25, 0.2];

/// Overall scores below this are low risk
pub const LOW_OVERALL_RISK_BELOW: f64 = 0.3;

/// Overall scores below this are medium risk
pub const MEDIUM_OVERALL_RISK_BELOW: f64 = 0.6;

// ============================================================================
// Range Prediction
// ============================================================================

/// Price band around the current price per unit of volatility (each side)
pub const RANGE_BUFFER_PER_VOLATILITY: f64 = 0.05;

/// Baseline APR before volume is accounted for
pub const BASE_RANGE_APR: f64 = 0.12;

/// Liquidity (USD) at which the liquidity term of the range risk score reaches 0
pub const DEEP_LIQUIDITY: f64 = 10_000_000.0;

// ============================================================================
// Store
// ============================================================================

/// Notifications kept before the oldest are dropped
pub const MAX_NOTIFICATIONS: usize = 50;

/// Risk score (APY percent + strategy modifier) below which a vault is Low risk
pub const LOW_RISK_THRESHOLD: f64 = 15.0;

/// Risk score below which a vault is Medium risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 25.0;
