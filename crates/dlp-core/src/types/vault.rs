//! Vault data and typed patches

use crate::errors::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vault strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[serde(alias = "concentrated-liquidity")]
    ConcentratedLiquidity,
    #[serde(alias = "yield-farming")]
    YieldFarming,
    Arbitrage,
    Hedge,
    #[serde(alias = "stable-max")]
    StableMax,
    #[serde(alias = "sei-hypergrowth")]
    SeiHypergrowth,
    #[serde(alias = "blue-chip")]
    BlueChip,
    #[serde(alias = "delta-neutral")]
    DeltaNeutral,
}

impl Strategy {
    pub const ALL: [Strategy; 8] = [
        Strategy::ConcentratedLiquidity,
        Strategy::YieldFarming,
        Strategy::Arbitrage,
        Strategy::Hedge,
        Strategy::StableMax,
        Strategy::SeiHypergrowth,
        Strategy::BlueChip,
        Strategy::DeltaNeutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::ConcentratedLiquidity => "concentrated_liquidity",
            Strategy::YieldFarming => "yield_farming",
            Strategy::Arbitrage => "arbitrage",
            Strategy::Hedge => "hedge",
            Strategy::StableMax => "stable_max",
            Strategy::SeiHypergrowth => "sei_hypergrowth",
            Strategy::BlueChip => "blue_chip",
            Strategy::DeltaNeutral => "delta_neutral",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| CoreError::invalid_argument("strategy", s, "a known vault strategy"))
    }
}

/// Risk bucket shown next to each vault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl FromStr for RiskLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(CoreError::invalid_argument("risk", s, "one of Low, Medium, High")),
        }
    }
}

/// Current concentrated-liquidity position held by a vault
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultPosition {
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub liquidity: u128,
    pub tokens_owed_0: u128,
    pub tokens_owed_1: u128,
}

impl VaultPosition {
    /// `lower < upper` and both ticks on the spacing grid
    pub fn validate(&self, tick_spacing: i32) -> CoreResult<()> {
        if self.lower_tick >= self.upper_tick {
            return Err(CoreError::validation(format!(
                "position lower tick {} must be below upper tick {}",
                self.lower_tick, self.upper_tick
            )));
        }
        if self.lower_tick % tick_spacing != 0 || self.upper_tick % tick_spacing != 0 {
            return Err(CoreError::validation(format!(
                "position [{}, {}] is not aligned to tick spacing {}",
                self.lower_tick, self.upper_tick, tick_spacing
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultPerformance {
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
}

/// A listed vault. `apy` is a fraction (0.124 for 12.4%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultData {
    pub address: String,
    pub name: String,
    pub strategy: Strategy,
    pub token_a: String,
    pub token_b: String,
    /// Fee tier in hundredths of a basis point (3000 = 0.30%)
    pub fee_tier: u32,
    pub tick_spacing: i32,
    pub tvl: f64,
    pub apy: f64,
    pub chain_id: u64,
    pub active: bool,
    #[serde(default)]
    pub position: Option<VaultPosition>,
    #[serde(default)]
    pub performance: VaultPerformance,
}

impl VaultData {
    pub fn validate(&self) -> CoreResult<()> {
        if self.address.trim().is_empty() {
            return Err(CoreError::validation("vault address cannot be empty"));
        }
        if self.tick_spacing <= 0 {
            return Err(CoreError::validation(format!(
                "vault {} tick spacing must be positive, got {}",
                self.address, self.tick_spacing
            )));
        }
        if !self.tvl.is_finite() || self.tvl < 0.0 {
            return Err(CoreError::validation(format!(
                "vault {} tvl must be a non-negative number, got {}",
                self.address, self.tvl
            )));
        }
        if !self.apy.is_finite() {
            return Err(CoreError::validation(format!("vault {} apy must be finite", self.address)));
        }
        if let Some(position) = &self.position {
            position.validate(self.tick_spacing)?;
        }
        Ok(())
    }

    pub fn pair(&self) -> String {
        format!("{}-{}", self.token_a, self.token_b)
    }
}

/// Replacement for a vault's position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionPatch {
    Set(VaultPosition),
    Clear,
}

/// Shallow patch for [`VaultData`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VaultPatch {
    pub name: Option<String>,
    pub strategy: Option<Strategy>,
    pub token_a: Option<String>,
    pub token_b: Option<String>,
    pub fee_tier: Option<u32>,
    pub tick_spacing: Option<i32>,
    pub tvl: Option<f64>,
    pub apy: Option<f64>,
    pub chain_id: Option<u64>,
    pub active: Option<bool>,
    pub position: Option<PositionPatch>,
    pub performance: Option<VaultPerformance>,
}

impl VaultPatch {
    pub fn is_empty(&self) -> bool {
        *self == VaultPatch::default()
    }

    /// Merge onto `vault`, returning the validated result.
    pub fn apply(&self, vault: &VaultData) -> CoreResult<VaultData> {
        let mut merged = vault.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(strategy) = self.strategy {
            merged.strategy = strategy;
        }
        if let Some(token_a) = &self.token_a {
            merged.token_a = token_a.clone();
        }
        if let Some(token_b) = &self.token_b {
            merged.token_b = token_b.clone();
        }
        if let Some(fee_tier) = self.fee_tier {
            merged.fee_tier = fee_tier;
        }
        if let Some(tick_spacing) = self.tick_spacing {
            merged.tick_spacing = tick_spacing;
        }
        if let Some(tvl) = self.tvl {
            merged.tvl = tvl;
        }
        if let Some(apy) = self.apy {
            merged.apy = apy;
        }
        if let Some(chain_id) = self.chain_id {
            merged.chain_id = chain_id;
        }
        if let Some(active) = self.active {
            merged.active = active;
        }
        match &self.position {
            Some(PositionPatch::Set(position)) => merged.position = Some(position.clone()),
            Some(PositionPatch::Clear) => merged.position = None,
            None => {}
        }
        if let Some(performance) = &self.performance {
            merged.performance = performance.clone();
        }

        merged.validate()?;
        Ok(merged)
    }
}
