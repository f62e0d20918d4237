//! # Yield Math
//!
//! Annualized return estimates from fee samples.

use crate::constants::DAYS_PER_YEAR;

/// Annualize fees collected over `timeframe_days` against `tvl`.
///
/// Returns `0.0` when any input is zero: zero is the "no signal" sentinel,
/// not an error.
pub fn calculate_apr(fees_collected: f64, timeframe_days: f64, tvl: f64) -> f64 {
    if tvl == 0.0 || timeframe_days == 0.0 || fees_collected == 0.0 {
        return 0.0;
    }

    (fees_collected / timeframe_days) * DAYS_PER_YEAR / tvl
}

/// Compound an APR into an APY over `periods_per_year` compounding periods.
pub fn apr_to_apy(apr: f64, periods_per_year: u32) -> f64 {
    if periods_per_year == 0 {
        return apr;
    }
    let n = periods_per_year as f64;
    (1.0 + apr / n).powf(n) - 1.0
}
