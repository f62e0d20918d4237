//! User positions in vaults

use crate::errors::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// A user's stake in one vault, looked up by `vault_address`.
///
/// `pnl` and `pnl_percentage` are derived from `current_value - deposited_amount`
/// and recomputed on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPosition {
    pub vault_address: String,
    pub shares: f64,
    pub deposited_amount: f64,
    pub current_value: f64,
    #[serde(default)]
    pub pnl: f64,
    #[serde(default)]
    pub pnl_percentage: f64,
}

impl UserPosition {
    pub fn new(vault_address: impl Into<String>, shares: f64, deposited_amount: f64, current_value: f64) -> Self {
        let mut position = Self {
            vault_address: vault_address.into(),
            shares,
            deposited_amount,
            current_value,
            pnl: 0.0,
            pnl_percentage: 0.0,
        };
        position.refresh_pnl();
        position
    }

    pub fn refresh_pnl(&mut self) {
        self.pnl = self.current_value - self.deposited_amount;
        self.pnl_percentage = if self.deposited_amount > 0.0 {
            self.pnl / self.deposited_amount * 100.0
        } else {
            0.0
        };
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.vault_address.trim().is_empty() {
            return Err(CoreError::validation("position vault address cannot be empty"));
        }
        for (field, value) in [
            ("shares", self.shares),
            ("depositedAmount", self.deposited_amount),
            ("currentValue", self.current_value),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::validation(format!(
                    "position {} {} must be a non-negative number, got {}",
                    self.vault_address, field, value
                )));
            }
        }
        Ok(())
    }
}

/// Shallow patch for [`UserPosition`]. P&L is derived, so it cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPositionPatch {
    pub shares: Option<f64>,
    pub deposited_amount: Option<f64>,
    pub current_value: Option<f64>,
}

impl UserPositionPatch {
    pub fn apply(&self, position: &UserPosition) -> CoreResult<UserPosition> {
        let mut merged = position.clone();
        if let Some(shares) = self.shares {
            merged.shares = shares;
        }
        if let Some(deposited) = self.deposited_amount {
            merged.deposited_amount = deposited;
        }
        if let Some(current) = self.current_value {
            merged.current_value = current;
        }
        merged.validate()?;
        merged.refresh_pnl();
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pnl_is_derived() {
        let position = UserPosition::new("0xabc", 10.0, 1_000.0, 1_150.0);
        assert_eq!(position.pnl, 150.0);
        assert!((position.pnl_percentage - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_deposit_has_zero_percentage() {
        let position = UserPosition::new("0xabc", 0.0, 0.0, 5.0);
        assert_eq!(position.pnl, 5.0);
        assert_eq!(position.pnl_percentage, 0.0);
    }

    #[test]
    fn test_patch_recomputes_pnl() {
        let position = UserPosition::new("0xabc", 10.0, 1_000.0, 1_150.0);
        let patch = UserPositionPatch {
            current_value: Some(900.0),
            ..Default::default()
        };
        let merged = patch.apply(&position).unwrap();
        assert_eq!(merged.pnl, -100.0);
        assert_eq!(merged.shares, 10.0);
    }

    #[test]
    fn test_patch_rejects_negative_values() {
        let position = UserPosition::new("0xabc", 10.0, 1_000.0, 1_150.0);
        let patch = UserPositionPatch {
            shares: Some(-1.0),
            ..Default::default()
        };
        assert!(patch.apply(&position).is_err());
    }

    #[test]
    fn test_pnl_fields_cannot_be_patched() {
        assert!(serde_json::from_str::<UserPositionPatch>(r#"{"pnl": 10.0}"#).is_err());
    }
}
