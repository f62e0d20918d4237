//! # Position Risk Assessment
//!
//! Weighted score over four component risks, each in `[0, 1]`:
//!
//! 1. Impermanent loss, from volatility and pair correlation
//! 2. Volatility, relative to [`MAX_VOLATILITY`]
//! 3. Liquidity depth, stepped around [`MIN_LIQUIDITY_DEPTH`]
//! 4. Concentration, the position's share of the pool relative to [`MAX_CONCENTRATION`]

use crate::constants::{
    LOW_OVERALL_RISK_BELOW, MAX_CONCENTRATION, MAX_VOLATILITY, MEDIUM_OVERALL_RISK_BELOW,
    MIN_LIQUIDITY_DEPTH, RISK_WEIGHTS,
};
use crate::errors::{CoreError, CoreResult};
use crate::types::RiskLevel;
use serde::{Deserialize, Serialize};

/// Market and position figures a risk assessment is computed from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskInputs {
    /// Annualized volatility as a fraction
    pub volatility: f64,
    /// Price correlation of the pair, in `[-1, 1]`
    pub correlation: f64,
    /// Pool liquidity in USD
    pub liquidity: f64,
    pub position_size: f64,
    pub total_pool_size: f64,
}

impl Default for RiskInputs {
    fn default() -> Self {
        Self {
            volatility: 0.3,
            correlation: 0.5,
            liquidity: 0.0,
            position_size: 0.0,
            total_pool_size: 1.0,
        }
    }
}

impl RiskInputs {
    pub fn validate(&self) -> CoreResult<()> {
        for (name, value) in [
            ("volatility", self.volatility),
            ("liquidity", self.liquidity),
            ("position_size", self.position_size),
            ("total_pool_size", self.total_pool_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::invalid_argument(name, value, "a finite, non-negative number"));
            }
        }
        if !(-1.0..=1.0).contains(&self.correlation) {
            return Err(CoreError::invalid_argument("correlation", self.correlation, "within [-1, 1]"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskComponents {
    pub impermanent_loss_risk: f64,
    pub volatility_risk: f64,
    pub liquidity_risk: f64,
    pub concentration_risk: f64,
}

impl RiskComponents {
    pub fn from_inputs(inputs: &RiskInputs) -> Self {
        let impermanent_loss_risk = (inputs.volatility * (1.0 - inputs.correlation) * 1.5).min(1.0);
        let volatility_risk = (inputs.volatility / MAX_VOLATILITY).min(1.0);
        let liquidity_risk = if inputs.liquidity < MIN_LIQUIDITY_DEPTH {
            0.8
        } else if inputs.liquidity < MIN_LIQUIDITY_DEPTH * 5.0 {
            0.4
        } else {
            0.1
        };
        let concentration = if inputs.total_pool_size > 0.0 {
            inputs.position_size / inputs.total_pool_size
        } else {
            0.0
        };

        Self {
            impermanent_loss_risk,
            volatility_risk,
            liquidity_risk,
            concentration_risk: (concentration / MAX_CONCENTRATION).min(1.0),
        }
    }

    /// Weighted sum of the components
    pub fn overall(&self) -> f64 {
        let [il, volatility, liquidity, concentration] = RISK_WEIGHTS;
        self.impermanent_loss_risk * il
            + self.volatility_risk * volatility
            + self.liquidity_risk * liquidity
            + self.concentration_risk * concentration
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub overall_risk_score: f64,
    pub risk_level: RiskLevel,
    pub components: RiskComponents,
    pub recommendations: Vec<String>,
}

/// Score a position and attach mitigation advice for its bucket.
pub fn assess_vault_risk(inputs: &RiskInputs) -> CoreResult<RiskAssessment> {
    inputs.validate()?;

    let components = RiskComponents::from_inputs(inputs);
    let overall_risk_score = components.overall();
    let risk_level = if overall_risk_score < LOW_OVERALL_RISK_BELOW {
        RiskLevel::Low
    } else if overall_risk_score < MEDIUM_OVERALL_RISK_BELOW {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    Ok(RiskAssessment {
        overall_risk_score,
        risk_level,
        components,
        recommendations: risk_recommendations(risk_level),
    })
}

fn risk_recommendations(level: RiskLevel) -> Vec<String> {
    let advice: &[&str] = match level {
        RiskLevel::High => &[
            "Consider reducing position size to limit exposure",
            "Implement tighter stop-loss mechanisms",
            "Increase rebalancing frequency to minimize IL",
            "Consider hedging strategies using perp futures",
        ],
        RiskLevel::Medium => &[
            "Monitor position closely for volatility spikes",
            "Consider partial position reduction if conditions worsen",
            "Maintain regular rebalancing schedule",
        ],
        RiskLevel::Low => &[
            "Current position within acceptable risk parameters",
            "Continue monitoring market conditions",
            "Consider position size increase if opportunities arise",
        ],
    };

    advice
        .iter()
        .chain(std::iter::once(&"Leverage SEI's 400ms finality for rapid risk response"))
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_score_medium() {
        let assessment = assess_vault_risk(&RiskInputs::default()).unwrap();
        let c = assessment.components;
        assert_relative_eq!(c.impermanent_loss_risk, 0.225, max_relative = 1e-9);
        assert_relative_eq!(c.volatility_risk, 0.375, max_relative = 1e-9);
        assert_eq!(c.liquidity_risk, 0.8);
        assert_eq!(c.concentration_risk, 0.0);
        // 0.0675 + 0.09375 + 0.2 + 0
        assert_relative_eq!(assessment.overall_risk_score, 0.36125, max_relative = 1e-9);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        assert_eq!(assessment.recommendations.len(), 4);
    }

    #[test]
    fn test_deep_correlated_pool_is_low_risk() {
        let inputs = RiskInputs {
            volatility: 0.1,
            correlation: 0.9,
            liquidity: 1_000_000.0,
            position_size: 1_000.0,
            total_pool_size: 1_000_000.0,
        };
        let assessment = assess_vault_risk(&inputs).unwrap();
        assert_eq!(assessment.components.liquidity_risk, 0.1);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(
            assessment.recommendations[0],
            "Current position within acceptable risk parameters"
        );
    }

    #[test]
    fn test_components_saturate() {
        let inputs = RiskInputs {
            volatility: 3.0,
            correlation: -1.0,
            liquidity: 20_000.0,
            position_size: 900.0,
            total_pool_size: 1_000.0,
        };
        let assessment = assess_vault_risk(&inputs).unwrap();
        let c = assessment.components;
        assert_eq!(c.impermanent_loss_risk, 1.0);
        assert_eq!(c.volatility_risk, 1.0);
        assert_eq!(c.liquidity_risk, 0.4);
        assert_eq!(c.concentration_risk, 1.0);
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.recommendations.len(), 5);
    }

    #[test]
    fn test_empty_pool_has_no_concentration() {
        let inputs = RiskInputs {
            position_size: 50.0,
            total_pool_size: 0.0,
            ..Default::default()
        };
        assert_eq!(assess_vault_risk(&inputs).unwrap().components.concentration_risk, 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        let bad_volatility = RiskInputs {
            volatility: -0.1,
            ..Default::default()
        };
        assert!(assess_vault_risk(&bad_volatility).is_err());

        let bad_correlation = RiskInputs {
            correlation: 1.5,
            ..Default::default()
        };
        assert!(assess_vault_risk(&bad_correlation).is_err());

        let nan_liquidity = RiskInputs {
            liquidity: f64::NAN,
            ..Default::default()
        };
        assert!(assess_vault_risk(&nan_liquidity).is_err());
    }
}
