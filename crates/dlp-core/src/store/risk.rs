//! Risk bucketing: APY percentage plus a per-strategy modifier.
//!
//! The same raw APY can land in different buckets depending on strategy.

use crate::constants::{LOW_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
use crate::types::{RiskLevel, Strategy, VaultData};

/// Percentage points added to the APY before bucketing
pub fn strategy_risk_modifier(strategy: Strategy) -> f64 {
    match strategy {
        Strategy::ConcentratedLiquidity => 0.0,
        Strategy::YieldFarming => 2.0,
        Strategy::Arbitrage => 5.0,
        Strategy::Hedge => -3.0,
        Strategy::StableMax => -5.0,
        Strategy::SeiHypergrowth => 8.0,
        Strategy::BlueChip => -2.0,
        Strategy::DeltaNeutral => -4.0,
    }
}

/// Classify a fractional APY (0.124 = 12.4%) under a strategy.
pub fn classify_risk(apy: f64, strategy: Strategy) -> RiskLevel {
    let score = apy * 100.0 + strategy_risk_modifier(strategy);
    if score < LOW_RISK_THRESHOLD {
        RiskLevel::Low
    } else if score < MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

impl VaultData {
    pub fn risk_level(&self) -> RiskLevel {
        classify_risk(self.apy, self.strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_buckets() {
        assert_eq!(classify_risk(0.10, Strategy::ConcentratedLiquidity), RiskLevel::Low);
        assert_eq!(classify_risk(0.20, Strategy::ConcentratedLiquidity), RiskLevel::Medium);
        assert_eq!(classify_risk(0.30, Strategy::ConcentratedLiquidity), RiskLevel::High);
    }

    #[test]
    fn test_same_apy_different_buckets() {
        let apy = 0.18;
        assert_eq!(classify_risk(apy, Strategy::StableMax), RiskLevel::Low);
        assert_eq!(classify_risk(apy, Strategy::ConcentratedLiquidity), RiskLevel::Medium);
        assert_eq!(classify_risk(apy, Strategy::SeiHypergrowth), RiskLevel::High);
    }

    #[test]
    fn test_threshold_edges() {
        // 10% + 5 = 15 sits on the Medium side of the boundary
        assert_eq!(classify_risk(0.10, Strategy::Arbitrage), RiskLevel::Medium);
        assert_eq!(classify_risk(0.0, Strategy::StableMax), RiskLevel::Low);
    }
}
