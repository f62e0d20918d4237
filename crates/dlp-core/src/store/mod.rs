//! # Vault Aggregation Store
//!
//! Observable state container for the vault collection, user positions,
//! view filters, live prices and notifications.
//!
//! Every mutation is a [`VaultAction`] applied atomically by [`VaultStore::dispatch`]:
//! an action is validated in full before any field changes, so readers never
//! see a partial update. Derived getters recompute on each call.

pub mod actions;
pub mod risk;
pub mod view;

pub use actions::VaultAction;
pub use risk::{classify_risk, strategy_risk_modifier};
pub use view::{filter_and_sort, SortDirection, SortKey, VaultFilters};

use crate::constants::MAX_NOTIFICATIONS;
use crate::errors::{CoreError, CoreResult};
use crate::types::{
    Notification, PriceUpdate, RiskLevel, Strategy, UserPosition, UserPositionPatch, VaultData,
    VaultPatch,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Plain data held by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub vaults: Vec<VaultData>,
    pub selected_vault: Option<String>,
    pub user_positions: Vec<UserPosition>,
    pub filters: VaultFilters,
    pub is_loading: bool,
    pub error: Option<String>,
    pub price_updates: BTreeMap<String, PriceUpdate>,
    pub notifications: VecDeque<Notification>,
}

/// Passed to listeners after each applied action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChange {
    pub revision: u64,
    pub action: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&StoreChange) + Send + Sync>;

#[derive(Default)]
pub struct VaultStore {
    state: StoreState,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for VaultStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultStore")
            .field("state", &self.state)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl VaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Apply one action. On failure the state is untouched and an error
    /// notification is queued.
    pub fn dispatch(&mut self, action: VaultAction) -> CoreResult<()> {
        let name = action.name();
        if let Err(err) = self.apply(action) {
            warn!(action = name, error = %err, "Store action rejected");
            self.push_notification(Notification::error(format!("{} failed", name), err.to_string()));
            self.commit(name);
            return Err(err);
        }

        debug!(action = name, revision = self.revision + 1, "Store action applied");
        self.commit(name);
        Ok(())
    }

    fn apply(&mut self, action: VaultAction) -> CoreResult<()> {
        match action {
            VaultAction::SetVaults(vaults) => {
                validate_unique_vaults(&vaults)?;
                self.state.vaults = vaults;
                self.state.is_loading = false;
                self.state.error = None;
                if let Some(selected) = &self.state.selected_vault {
                    if self.vault(selected).is_none() {
                        self.state.selected_vault = None;
                    }
                }
            }
            VaultAction::AddVault(vault) => {
                vault.validate()?;
                match self.state.vaults.iter_mut().find(|v| v.address == vault.address) {
                    Some(existing) => *existing = vault,
                    None => self.state.vaults.push(vault),
                }
            }
            VaultAction::UpdateVault { address, patch } => {
                if let Some(index) = self.state.vaults.iter().position(|v| v.address == address) {
                    let merged = patch.apply(&self.state.vaults[index])?;
                    self.state.vaults[index] = merged;
                } else {
                    debug!(%address, "updateVault on unknown address ignored");
                }
            }
            VaultAction::RemoveVault { address } => {
                self.state.vaults.retain(|v| v.address != address);
                if self.state.selected_vault.as_deref() == Some(address.as_str()) {
                    self.state.selected_vault = None;
                }
            }
            VaultAction::SelectVault(address) => {
                if let Some(address) = &address {
                    if self.vault(address).is_none() {
                        return Err(CoreError::validation(format!("vault {} is not listed", address)));
                    }
                }
                self.state.selected_vault = address;
            }
            VaultAction::SetUserPositions(mut positions) => {
                for position in positions.iter_mut() {
                    position.validate()?;
                    position.refresh_pnl();
                }
                self.state.user_positions = positions;
            }
            VaultAction::AddUserPosition(mut position) => {
                position.validate()?;
                position.refresh_pnl();
                self.state.user_positions.push(position);
            }
            VaultAction::UpdateUserPosition { vault_address, patch } => {
                let merged = self
                    .state
                    .user_positions
                    .iter()
                    .filter(|p| p.vault_address == vault_address)
                    .map(|p| patch.apply(p))
                    .collect::<CoreResult<Vec<_>>>()?;
                let mut merged = merged.into_iter();
                for position in self
                    .state
                    .user_positions
                    .iter_mut()
                    .filter(|p| p.vault_address == vault_address)
                {
                    if let Some(next) = merged.next() {
                        *position = next;
                    }
                }
            }
            VaultAction::RemoveUserPosition { vault_address } => {
                self.state.user_positions.retain(|p| p.vault_address != vault_address);
            }
            VaultAction::SetStrategyFilter(strategy) => self.state.filters.strategy = strategy,
            VaultAction::SetRiskFilter(risk) => self.state.filters.risk = risk,
            VaultAction::SetSort { key, direction } => {
                self.state.filters.sort_by = key;
                self.state.filters.sort_direction = direction;
            }
            VaultAction::SetLoading(loading) => self.state.is_loading = loading,
            VaultAction::SetError(error) => {
                self.state.error = error;
                self.state.is_loading = false;
            }
            VaultAction::UpdatePrices(updates) => {
                if let Some((symbol, price)) = updates.iter().find(|(_, p)| !p.is_finite() || **p <= 0.0) {
                    return Err(CoreError::validation(format!(
                        "price for {} must be positive, got {}",
                        symbol, price
                    )));
                }
                let updated_at = Utc::now();
                for (symbol, price) in updates {
                    self.state
                        .price_updates
                        .insert(symbol, PriceUpdate { price, updated_at });
                }
            }
            VaultAction::AddNotification(notification) => self.push_notification(notification),
            VaultAction::MarkNotificationRead(id) => {
                if let Some(notification) = self.state.notifications.iter_mut().find(|n| n.id == id) {
                    notification.read = true;
                }
            }
            VaultAction::ClearNotifications => self.state.notifications.clear(),
            VaultAction::Reset => self.state = StoreState::default(),
        }
        Ok(())
    }

    fn push_notification(&mut self, notification: Notification) {
        self.state.notifications.push_back(notification);
        while self.state.notifications.len() > MAX_NOTIFICATIONS {
            self.state.notifications.pop_front();
        }
    }

    fn commit(&mut self, action: &'static str) {
        self.revision += 1;
        let change = StoreChange {
            revision: self.revision,
            action,
        };
        for (_, listener) in &self.listeners {
            listener(&change);
        }
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreChange) + Send + Sync + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    // ========================================================================
    // Actions
    // ========================================================================

    pub fn set_vaults(&mut self, vaults: Vec<VaultData>) -> CoreResult<()> {
        self.dispatch(VaultAction::SetVaults(vaults))
    }

    pub fn add_vault(&mut self, vault: VaultData) -> CoreResult<()> {
        self.dispatch(VaultAction::AddVault(vault))
    }

    pub fn update_vault(&mut self, address: &str, patch: VaultPatch) -> CoreResult<()> {
        self.dispatch(VaultAction::UpdateVault {
            address: address.to_string(),
            patch,
        })
    }

    pub fn remove_vault(&mut self, address: &str) -> CoreResult<()> {
        self.dispatch(VaultAction::RemoveVault {
            address: address.to_string(),
        })
    }

    pub fn select_vault(&mut self, address: Option<&str>) -> CoreResult<()> {
        self.dispatch(VaultAction::SelectVault(address.map(str::to_string)))
    }

    pub fn set_user_positions(&mut self, positions: Vec<UserPosition>) -> CoreResult<()> {
        self.dispatch(VaultAction::SetUserPositions(positions))
    }

    pub fn add_user_position(&mut self, position: UserPosition) -> CoreResult<()> {
        self.dispatch(VaultAction::AddUserPosition(position))
    }

    pub fn update_user_position(&mut self, vault_address: &str, patch: UserPositionPatch) -> CoreResult<()> {
        self.dispatch(VaultAction::UpdateUserPosition {
            vault_address: vault_address.to_string(),
            patch,
        })
    }

    pub fn remove_user_position(&mut self, vault_address: &str) -> CoreResult<()> {
        self.dispatch(VaultAction::RemoveUserPosition {
            vault_address: vault_address.to_string(),
        })
    }

    pub fn set_strategy_filter(&mut self, strategy: Option<Strategy>) -> CoreResult<()> {
        self.dispatch(VaultAction::SetStrategyFilter(strategy))
    }

    pub fn set_risk_filter(&mut self, risk: Option<RiskLevel>) -> CoreResult<()> {
        self.dispatch(VaultAction::SetRiskFilter(risk))
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) -> CoreResult<()> {
        self.dispatch(VaultAction::SetSort { key, direction })
    }

    pub fn set_loading(&mut self, loading: bool) -> CoreResult<()> {
        self.dispatch(VaultAction::SetLoading(loading))
    }

    pub fn set_error(&mut self, error: Option<String>) -> CoreResult<()> {
        self.dispatch(VaultAction::SetError(error))
    }

    pub fn update_prices(&mut self, updates: HashMap<String, f64>) -> CoreResult<()> {
        self.dispatch(VaultAction::UpdatePrices(updates))
    }

    pub fn add_notification(&mut self, notification: Notification) -> CoreResult<()> {
        self.dispatch(VaultAction::AddNotification(notification))
    }

    pub fn mark_notification_read(&mut self, id: Uuid) -> CoreResult<()> {
        self.dispatch(VaultAction::MarkNotificationRead(id))
    }

    pub fn clear_notifications(&mut self) -> CoreResult<()> {
        self.dispatch(VaultAction::ClearNotifications)
    }

    /// Back to the initial state. Listeners stay registered and the revision
    /// keeps counting up.
    pub fn reset(&mut self) {
        if let Err(err) = self.dispatch(VaultAction::Reset) {
            warn!(error = %err, "Store reset rejected");
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn vaults(&self) -> &[VaultData] {
        &self.state.vaults
    }

    pub fn vault(&self, address: &str) -> Option<&VaultData> {
        self.state.vaults.iter().find(|v| v.address == address)
    }

    pub fn selected_vault(&self) -> Option<&VaultData> {
        self.state
            .selected_vault
            .as_deref()
            .and_then(|address| self.vault(address))
    }

    pub fn user_positions(&self) -> &[UserPosition] {
        &self.state.user_positions
    }

    pub fn user_position(&self, vault_address: &str) -> Option<&UserPosition> {
        self.state
            .user_positions
            .iter()
            .find(|p| p.vault_address == vault_address)
    }

    /// The vault a position refers to, if still listed
    pub fn vault_for_position(&self, position: &UserPosition) -> Option<&VaultData> {
        self.vault(&position.vault_address)
    }

    pub fn filters(&self) -> &VaultFilters {
        &self.state.filters
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn price_updates(&self) -> &BTreeMap<String, PriceUpdate> {
        &self.state.price_updates
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.state.notifications.iter()
    }

    pub fn unread_notifications(&self) -> usize {
        self.state.notifications.iter().filter(|n| !n.read).count()
    }

    // ========================================================================
    // Derived
    // ========================================================================

    /// Vaults passing the active filters, sorted by the active key
    pub fn get_filtered_vaults(&self) -> Vec<&VaultData> {
        filter_and_sort(&self.state.vaults, &self.state.filters)
    }

    pub fn get_total_tvl(&self) -> f64 {
        self.state.vaults.iter().map(|v| v.tvl).sum()
    }

    pub fn get_user_total_value(&self) -> f64 {
        self.state.user_positions.iter().map(|p| p.current_value).sum()
    }

    pub fn get_user_total_pnl(&self) -> f64 {
        self.state.user_positions.iter().map(|p| p.pnl).sum()
    }
}

fn validate_unique_vaults(vaults: &[VaultData]) -> CoreResult<()> {
    let mut seen = HashSet::with_capacity(vaults.len());
    for vault in vaults {
        vault.validate()?;
        if !seen.insert(vault.address.as_str()) {
            return Err(CoreError::validation(format!(
                "duplicate vault address {}",
                vault.address
            )));
        }
    }
    Ok(())
}
