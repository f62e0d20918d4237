//! # Gas Estimates
//!
//! Static per-operation gas costs in SEI. Advisory only: unknown operations
//! fall back to [`DEFAULT_GAS_COST`] rather than failing a flow.

use crate::constants::DEFAULT_GAS_COST;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GasOperation {
    Swap,
    AddLiquidity,
    RemoveLiquidity,
    Rebalance,
    ClaimFees,
    VaultCreation,
}

impl GasOperation {
    pub const ALL: [GasOperation; 6] = [
        GasOperation::Swap,
        GasOperation::AddLiquidity,
        GasOperation::RemoveLiquidity,
        GasOperation::Rebalance,
        GasOperation::ClaimFees,
        GasOperation::VaultCreation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GasOperation::Swap => "swap",
            GasOperation::AddLiquidity => "add_liquidity",
            GasOperation::RemoveLiquidity => "remove_liquidity",
            GasOperation::Rebalance => "rebalance",
            GasOperation::ClaimFees => "claim_fees",
            GasOperation::VaultCreation => "vault_creation",
        }
    }

    /// Fixed cost in SEI
    pub fn cost(&self) -> f64 {
        match self {
            GasOperation::Swap => 0.001,
            GasOperation::AddLiquidity => 0.002,
            GasOperation::RemoveLiquidity => 0.0015,
            GasOperation::Rebalance => 0.003,
            GasOperation::ClaimFees => 0.0008,
            GasOperation::VaultCreation => 0.005,
        }
    }
}

impl fmt::Display for GasOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GasOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GasOperation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown gas operation: {}", s))
    }
}

/// Gas cost for an operation name; unknown names cost [`DEFAULT_GAS_COST`].
pub fn estimate_sei_gas_cost(operation: &str) -> f64 {
    operation
        .parse::<GasOperation>()
        .map(|op| op.cost())
        .unwrap_or(DEFAULT_GAS_COST)
}
