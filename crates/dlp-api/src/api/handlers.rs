//! API request handlers

use super::{responses::*, ApiState};
use crate::error::{ApiError, ApiResult};
use crate::request::{generate_cache_key, parse_pagination};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use dlp_core::constants::DEFAULT_TICK_SPACING;
use dlp_core::math::{self, GasOperation, RiskInputs};
use dlp_core::store::{filter_and_sort, SortDirection, SortKey, VaultFilters};
use dlp_core::types::{
    RiskLevel, Strategy, UserPosition, UserPositionPatch, VaultData, VaultPatch,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

// ============================================================================
// Vaults
// ============================================================================

/// Query filters override the store's active filters for this request only
fn filters_from_query(base: &VaultFilters, query: &HashMap<String, String>) -> ApiResult<VaultFilters> {
    let mut filters = *base;
    if let Some(strategy) = query.get("strategy").filter(|s| !s.is_empty()) {
        filters.strategy = Some(strategy.parse::<Strategy>()?);
    }
    if let Some(risk) = query.get("risk").filter(|s| !s.is_empty()) {
        filters.risk = Some(risk.parse::<RiskLevel>()?);
    }
    if let Some(sort) = query.get("sort").filter(|s| !s.is_empty()) {
        filters.sort_by = sort.parse::<SortKey>()?;
    }
    if let Some(direction) = query.get("direction").filter(|s| !s.is_empty()) {
        filters.sort_direction = direction.parse::<SortDirection>()?;
    }
    Ok(filters)
}

/// List vaults through the active filters, paginated
pub async fn list_vaults(
    State(state): State<ApiState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let pagination = parse_pagination(&query);
    let cache_key = generate_cache_key("vaults", &query);

    let store = state.store.read().await;
    let revision = store.revision();
    if let Some(cached) = state.cache.lock().await.get(&cache_key, revision, Instant::now()) {
        tracing::debug!(key = %cache_key, "Serving vault list from cache");
        return Ok(json_body(cached));
    }

    let filters = filters_from_query(store.filters(), &query)?;
    let view = filter_and_sort(store.vaults(), &filters);
    let page = pagination.slice(&view);

    let response = VaultsResponse {
        vaults: page.iter().map(|v| VaultView::from(*v)).collect(),
        filters,
        total: view.len(),
        page: pagination.page,
        limit: pagination.limit,
        offset: pagination.offset,
    };

    // Serialized straight to text: `Value` cannot hold u128 liquidity
    let body: Arc<str> = serde_json::to_string(&response)
        .map_err(|e| ApiError::Other(e.into()))?
        .into();
    state
        .cache
        .lock()
        .await
        .insert(cache_key, Arc::clone(&body), revision, Instant::now());
    Ok(json_body(body))
}

fn json_body(body: Arc<str>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body.to_string()).into_response()
}

/// Get specific vault
pub async fn get_vault(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> ApiResult<Json<VaultResponse>> {
    let store = state.store.read().await;
    let vault = store
        .vault(&address)
        .ok_or_else(|| ApiError::NotFound(format!("vault {}", address)))?;
    Ok(Json(VaultResponse { vault: vault.into() }))
}

/// Replace the vault collection
pub async fn replace_vaults(
    State(state): State<ApiState>,
    Json(vaults): Json<Vec<VaultData>>,
) -> ApiResult<Json<ReplacedResponse>> {
    let count = vaults.len();
    let mut store = state.store.write().await;
    store.set_vaults(vaults)?;
    tracing::info!(count, "Vault collection replaced");
    Ok(Json(ReplacedResponse {
        count,
        revision: store.revision(),
    }))
}

/// Insert or replace one vault
pub async fn add_vault(
    State(state): State<ApiState>,
    Json(vault): Json<VaultData>,
) -> ApiResult<(StatusCode, Json<VaultResponse>)> {
    let response = VaultResponse {
        vault: (&vault).into(),
    };
    state.store.write().await.add_vault(vault)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Shallow-merge a patch into a vault
pub async fn update_vault(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(patch): Json<VaultPatch>,
) -> ApiResult<Json<VaultResponse>> {
    let mut store = state.store.write().await;
    if store.vault(&address).is_none() {
        return Err(ApiError::NotFound(format!("vault {}", address)));
    }
    if patch.is_empty() {
        return Err(ApiError::Validation("patch contains no fields".to_string()));
    }
    store.update_vault(&address, patch)?;
    let vault = store
        .vault(&address)
        .ok_or_else(|| ApiError::NotFound(format!("vault {}", address)))?;
    Ok(Json(VaultResponse { vault: vault.into() }))
}

pub async fn remove_vault(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    if store.vault(&address).is_none() {
        return Err(ApiError::NotFound(format!("vault {}", address)));
    }
    store.remove_vault(&address)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AprQuery {
    pub fees: f64,
    pub days: f64,
}

/// APR of a fee sample against the vault's current TVL
pub async fn get_vault_apr(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Query(query): Query<AprQuery>,
) -> ApiResult<Json<AprResponse>> {
    let tvl = state
        .store
        .read()
        .await
        .vault(&address)
        .map(|v| v.tvl)
        .ok_or_else(|| ApiError::NotFound(format!("vault {}", address)))?;

    let apr = math::calculate_apr(query.fees, query.days, tvl);
    Ok(Json(AprResponse {
        address,
        fees_collected: query.fees,
        timeframe_days: query.days,
        tvl,
        apr,
        apy: math::apr_to_apy(apr, 365),
    }))
}

// ============================================================================
// Positions
// ============================================================================

pub async fn list_positions(State(state): State<ApiState>) -> Json<PositionsResponse> {
    let store = state.store.read().await;
    Json(PositionsResponse {
        positions: store.user_positions().to_vec(),
        total_value: store.get_user_total_value(),
        total_pnl: store.get_user_total_pnl(),
    })
}

pub async fn replace_positions(
    State(state): State<ApiState>,
    Json(positions): Json<Vec<UserPosition>>,
) -> ApiResult<Json<ReplacedResponse>> {
    let count = positions.len();
    let mut store = state.store.write().await;
    store.set_user_positions(positions)?;
    Ok(Json(ReplacedResponse {
        count,
        revision: store.revision(),
    }))
}

pub async fn add_position(
    State(state): State<ApiState>,
    Json(position): Json<UserPosition>,
) -> ApiResult<(StatusCode, Json<UserPosition>)> {
    let mut store = state.store.write().await;
    let vault_address = position.vault_address.clone();
    store.add_user_position(position)?;
    let stored = store
        .user_positions()
        .iter()
        .rev()
        .find(|p| p.vault_address == vault_address)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("position {}", vault_address)))?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn update_position(
    State(state): State<ApiState>,
    Path(vault_address): Path<String>,
    Json(patch): Json<UserPositionPatch>,
) -> ApiResult<Json<UserPosition>> {
    let mut store = state.store.write().await;
    if store.user_position(&vault_address).is_none() {
        return Err(ApiError::NotFound(format!("position {}", vault_address)));
    }
    store.update_user_position(&vault_address, patch)?;
    store
        .user_position(&vault_address)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("position {}", vault_address)))
}

pub async fn remove_position(
    State(state): State<ApiState>,
    Path(vault_address): Path<String>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    if store.user_position(&vault_address).is_none() {
        return Err(ApiError::NotFound(format!("position {}", vault_address)));
    }
    store.remove_user_position(&vault_address)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Portfolio-level aggregates
pub async fn get_portfolio(State(state): State<ApiState>) -> Json<PortfolioResponse> {
    let store = state.store.read().await;
    Json(PortfolioResponse {
        total_tvl: store.get_total_tvl(),
        user_total_value: store.get_user_total_value(),
        user_total_pnl: store.get_user_total_pnl(),
        position_count: store.user_positions().len(),
        vault_count: store.vaults().len(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

// ============================================================================
// Prices & notifications
// ============================================================================

pub async fn get_prices(State(state): State<ApiState>) -> Json<PricesResponse> {
    Json(PricesResponse {
        prices: state.store.read().await.price_updates().clone(),
    })
}

/// Merge symbol -> price updates into the live price map
pub async fn update_prices(
    State(state): State<ApiState>,
    Json(updates): Json<HashMap<String, f64>>,
) -> ApiResult<Json<PricesResponse>> {
    let mut store = state.store.write().await;
    store.update_prices(updates)?;
    Ok(Json(PricesResponse {
        prices: store.price_updates().clone(),
    }))
}

pub async fn list_notifications(State(state): State<ApiState>) -> Json<NotificationsResponse> {
    let store = state.store.read().await;
    Json(NotificationsResponse {
        notifications: store.notifications().cloned().collect(),
        unread: store.unread_notifications(),
    })
}

pub async fn clear_notifications(State(state): State<ApiState>) -> ApiResult<StatusCode> {
    state.store.write().await.clear_notifications()?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Estimators
// ============================================================================

/// Advisory gas cost; unknown operations get the default
pub async fn get_gas_estimate(Path(operation): Path<String>) -> Json<GasEstimateResponse> {
    let known = operation.parse::<GasOperation>().is_ok();
    Json(GasEstimateResponse {
        cost: math::estimate_sei_gas_cost(&operation),
        operation,
        known,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceRequest {
    pub vault_address: Option<String>,
    pub current_tick: i32,
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub utilization_rate: f64,
    pub tick_spacing: Option<i32>,
}

/// Spacing comes from the request, else the listed vault, else the default
pub async fn analyze_rebalance(
    State(state): State<ApiState>,
    Json(request): Json<RebalanceRequest>,
) -> ApiResult<Json<RebalanceResponse>> {
    let vault_spacing = match &request.vault_address {
        Some(address) => state.store.read().await.vault(address).map(|v| v.tick_spacing),
        None => None,
    };
    let tick_spacing = request
        .tick_spacing
        .or(vault_spacing)
        .unwrap_or(DEFAULT_TICK_SPACING);

    let recommendation = math::analyze_rebalance(
        request.current_tick,
        request.lower_tick,
        request.upper_tick,
        request.utilization_rate,
        tick_spacing,
    )?;

    Ok(Json(RebalanceResponse {
        vault_address: request.vault_address,
        tick_spacing,
        recommendation,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRequest {
    pub vault_address: Option<String>,
    pub volatility: Option<f64>,
    pub correlation: Option<f64>,
    pub liquidity: Option<f64>,
    pub position_size: Option<f64>,
    pub total_pool_size: Option<f64>,
}

/// Weighted position risk. Liquidity falls back to the listed vault's TVL.
pub async fn analyze_risk(
    State(state): State<ApiState>,
    Json(request): Json<RiskRequest>,
) -> ApiResult<Json<RiskResponse>> {
    let vault_tvl = match &request.vault_address {
        Some(address) => state.store.read().await.vault(address).map(|v| v.tvl),
        None => None,
    };

    let defaults = RiskInputs::default();
    let inputs = RiskInputs {
        volatility: request.volatility.unwrap_or(defaults.volatility),
        correlation: request.correlation.unwrap_or(defaults.correlation),
        liquidity: request.liquidity.or(vault_tvl).unwrap_or(defaults.liquidity),
        position_size: request.position_size.unwrap_or(defaults.position_size),
        total_pool_size: request.total_pool_size.unwrap_or(defaults.total_pool_size),
    };

    let assessment = math::assess_vault_risk(&inputs)?;
    tracing::debug!(
        vault = ?request.vault_address,
        score = assessment.overall_risk_score,
        "Risk assessed"
    );
    Ok(Json(RiskResponse {
        vault_address: request.vault_address,
        assessment,
        timestamp: chrono::Utc::now().timestamp(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalRangeRequest {
    pub vault_address: Option<String>,
    pub current_price: f64,
    pub volume_24h: f64,
    pub volatility: f64,
    pub liquidity: f64,
    pub tick_spacing: Option<i32>,
}

pub async fn predict_optimal_range(
    State(state): State<ApiState>,
    Json(request): Json<OptimalRangeRequest>,
) -> ApiResult<Json<OptimalRangeResponse>> {
    let vault_spacing = match &request.vault_address {
        Some(address) => state.store.read().await.vault(address).map(|v| v.tick_spacing),
        None => None,
    };
    let tick_spacing = request
        .tick_spacing
        .or(vault_spacing)
        .unwrap_or(DEFAULT_TICK_SPACING);

    let range = math::predict_optimal_range(
        request.current_price,
        request.volume_24h,
        request.volatility,
        request.liquidity,
        tick_spacing,
    )?;

    Ok(Json(OptimalRangeResponse {
        vault_address: request.vault_address,
        tick_spacing,
        range,
    }))
}

// ============================================================================
// Tick math
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TickQuery {
    pub tick: i32,
}

pub async fn tick_to_price(Query(query): Query<TickQuery>) -> ApiResult<Json<TickPriceResponse>> {
    if !math::is_tick_valid(query.tick) {
        return Err(ApiError::Validation(format!("tick {} out of range", query.tick)));
    }
    Ok(Json(TickPriceResponse {
        tick: query.tick,
        price: math::tick_to_price(query.tick),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub price: f64,
}

pub async fn price_to_tick(Query(query): Query<PriceQuery>) -> ApiResult<Json<PriceTickResponse>> {
    let tick = math::price_to_tick(query.price)?;
    Ok(Json(PriceTickResponse {
        price: query.price,
        tick,
        nearest_tick: tick.round() as i32,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AlignQuery {
    pub tick: i32,
    pub spacing: i32,
}

pub async fn align_tick(Query(query): Query<AlignQuery>) -> ApiResult<Json<AlignResponse>> {
    Ok(Json(AlignResponse {
        tick: query.tick,
        spacing: query.spacing,
        aligned_tick: math::align_to_tick_spacing(query.tick, query.spacing)?,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PriceRangeQuery {
    pub lower: f64,
    pub upper: f64,
    pub spacing: Option<i32>,
}

pub async fn price_range(Query(query): Query<PriceRangeQuery>) -> ApiResult<Json<TickRangeResponse>> {
    let spacing = query.spacing.unwrap_or(DEFAULT_TICK_SPACING);
    let range = math::price_range_to_ticks(query.lower, query.upper, spacing)?;
    Ok(Json(TickRangeResponse {
        lower_tick: range.lower_tick,
        upper_tick: range.upper_tick,
        lower_price: range.lower_price(),
        upper_price: range.upper_price(),
    }))
}
