//! API response types

use dlp_core::math::{OptimalRange, RebalanceRecommendation, RiskAssessment};
use dlp_core::store::VaultFilters;
use dlp_core::types::{Notification, PriceUpdate, RiskLevel, UserPosition, VaultData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vault with its derived risk bucket
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultView {
    #[serde(flatten)]
    pub vault: VaultData,
    pub risk_level: RiskLevel,
}

impl From<&VaultData> for VaultView {
    fn from(vault: &VaultData) -> Self {
        Self {
            risk_level: vault.risk_level(),
            vault: vault.clone(),
        }
    }
}

/// Response for vaults list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultsResponse {
    pub vaults: Vec<VaultView>,
    pub filters: VaultFilters,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub offset: u64,
}

/// Response for single vault
#[derive(Debug, Serialize)]
pub struct VaultResponse {
    pub vault: VaultView,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacedResponse {
    pub count: usize,
    pub revision: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AprResponse {
    pub address: String,
    pub fees_collected: f64,
    pub timeframe_days: f64,
    pub tvl: f64,
    pub apr: f64,
    /// APR compounded daily
    pub apy: f64,
}

/// Response for positions list
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsResponse {
    pub positions: Vec<UserPosition>,
    pub total_value: f64,
    pub total_pnl: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub total_tvl: f64,
    pub user_total_value: f64,
    pub user_total_pnl: f64,
    pub position_count: usize,
    pub vault_count: usize,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PricesResponse {
    pub prices: BTreeMap<String, PriceUpdate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub unread: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TickPriceResponse {
    pub tick: i32,
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTickResponse {
    pub price: f64,
    pub tick: f64,
    pub nearest_tick: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignResponse {
    pub tick: i32,
    pub spacing: i32,
    pub aligned_tick: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickRangeResponse {
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub lower_price: f64,
    pub upper_price: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GasEstimateResponse {
    pub operation: String,
    pub cost: f64,
    pub known: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceResponse {
    pub vault_address: Option<String>,
    pub tick_spacing: i32,
    #[serde(flatten)]
    pub recommendation: RebalanceRecommendation,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResponse {
    pub vault_address: Option<String>,
    #[serde(flatten)]
    pub assessment: RiskAssessment,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalRangeResponse {
    pub vault_address: Option<String>,
    pub tick_spacing: i32,
    #[serde(flatten)]
    pub range: OptimalRange,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub timestamp: i64,
}
