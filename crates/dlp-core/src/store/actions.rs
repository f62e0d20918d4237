//! Store actions as a tagged union

use super::view::{SortDirection, SortKey};
use crate::types::{
    Notification, RiskLevel, Strategy, UserPosition, UserPositionPatch, VaultData, VaultPatch,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Every mutation the store accepts. Applied one at a time by
/// [`VaultStore::dispatch`](super::VaultStore::dispatch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum VaultAction {
    SetVaults(Vec<VaultData>),
    AddVault(VaultData),
    #[serde(rename_all = "camelCase")]
    UpdateVault { address: String, patch: VaultPatch },
    #[serde(rename_all = "camelCase")]
    RemoveVault { address: String },
    SelectVault(Option<String>),
    SetUserPositions(Vec<UserPosition>),
    AddUserPosition(UserPosition),
    #[serde(rename_all = "camelCase")]
    UpdateUserPosition { vault_address: String, patch: UserPositionPatch },
    #[serde(rename_all = "camelCase")]
    RemoveUserPosition { vault_address: String },
    SetStrategyFilter(Option<Strategy>),
    SetRiskFilter(Option<RiskLevel>),
    #[serde(rename_all = "camelCase")]
    SetSort { key: SortKey, direction: SortDirection },
    SetLoading(bool),
    SetError(Option<String>),
    UpdatePrices(HashMap<String, f64>),
    AddNotification(Notification),
    MarkNotificationRead(Uuid),
    ClearNotifications,
    Reset,
}

impl VaultAction {
    pub fn name(&self) -> &'static str {
        match self {
            VaultAction::SetVaults(_) => "setVaults",
            VaultAction::AddVault(_) => "addVault",
            VaultAction::UpdateVault { .. } => "updateVault",
            VaultAction::RemoveVault { .. } => "removeVault",
            VaultAction::SelectVault(_) => "selectVault",
            VaultAction::SetUserPositions(_) => "setUserPositions",
            VaultAction::AddUserPosition(_) => "addUserPosition",
            VaultAction::UpdateUserPosition { .. } => "updateUserPosition",
            VaultAction::RemoveUserPosition { .. } => "removeUserPosition",
            VaultAction::SetStrategyFilter(_) => "setStrategyFilter",
            VaultAction::SetRiskFilter(_) => "setRiskFilter",
            VaultAction::SetSort { .. } => "setSort",
            VaultAction::SetLoading(_) => "setLoading",
            VaultAction::SetError(_) => "setError",
            VaultAction::UpdatePrices(_) => "updatePrices",
            VaultAction::AddNotification(_) => "addNotification",
            VaultAction::MarkNotificationRead(_) => "markNotificationRead",
            VaultAction::ClearNotifications => "clearNotifications",
            VaultAction::Reset => "reset",
        }
    }
}
