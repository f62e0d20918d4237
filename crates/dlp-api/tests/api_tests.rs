//! API integration tests

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use dlp_api::api::{create_router, ApiState};
use dlp_api::config::ApiServiceConfig;
use dlp_core::types::{Strategy, VaultData, VaultPerformance};
use dlp_core::VaultStore;
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

fn make_vault(address: &str, name: &str, strategy: Strategy, apy: f64, tvl: f64) -> VaultData {
    VaultData {
        address: address.to_string(),
        name: name.to_string(),
        strategy,
        token_a: "SEI".to_string(),
        token_b: "USDC".to_string(),
        fee_tier: 3000,
        tick_spacing: 60,
        tvl,
        apy,
        chain_id: 1328,
        active: true,
        position: None,
        performance: VaultPerformance::default(),
    }
}

fn seeded_store() -> VaultStore {
    let mut store = VaultStore::new();
    store
        .set_vaults(vec![
            make_vault("0x01", "Bravo", Strategy::ConcentratedLiquidity, 0.12, 1_000_000.0),
            make_vault("0x02", "Alpha", Strategy::StableMax, 0.08, 3_000_000.0),
            make_vault("0x03", "Delta", Strategy::SeiHypergrowth, 0.30, 500_000.0),
            make_vault("0x04", "Charlie", Strategy::ConcentratedLiquidity, 0.20, 750_000.0),
        ])
        .unwrap();
    store
}

/// Router over a seeded store with a generous rate limit
fn create_test_api() -> (Router, ApiState) {
    create_test_api_with(ApiServiceConfig::default())
}

fn create_test_api_with(config: ApiServiceConfig) -> (Router, ApiState) {
    let state = ApiState::with_store(seeded_store(), &config);
    (create_router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)?
    };
    Ok((status, value))
}

async fn get(app: &Router, uri: &str) -> Result<(StatusCode, Value)> {
    send(app, Request::builder().uri(uri).body(Body::empty())?).await
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?;
    send(app, request).await
}

fn addresses(value: &Value) -> Vec<String> {
    value["vaults"]
        .as_array()
        .map(|vaults| {
            vaults
                .iter()
                .filter_map(|v| v["address"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (app, _) = create_test_api();
    let (status, body) = get(&app, "/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "dlp-api");
    Ok(())
}

#[tokio::test]
async fn test_list_vaults_default_order_is_apy_desc() -> Result<()> {
    let (app, _) = create_test_api();
    let (status, body) = get(&app, "/vaults").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(addresses(&body), vec!["0x03", "0x04", "0x01", "0x02"]);
    assert_eq!(body["total"], 4);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 50);
    assert_eq!(body["vaults"][0]["riskLevel"], "High");
    Ok(())
}

#[tokio::test]
async fn test_list_vaults_pagination() -> Result<()> {
    let (app, _) = create_test_api();
    let (_, body) = get(&app, "/vaults?page=2&limit=3").await?;

    assert_eq!(addresses(&body), vec!["0x02"]);
    assert_eq!(body["offset"], 3);
    assert_eq!(body["total"], 4);

    let (_, body) = get(&app, "/vaults?page=-4&limit=9999").await?;
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 1000);
    Ok(())
}

#[tokio::test]
async fn test_list_vaults_query_filters() -> Result<()> {
    let (app, _) = create_test_api();

    let (_, body) = get(&app, "/vaults?strategy=concentrated_liquidity&sort=name&direction=asc").await?;
    assert_eq!(addresses(&body), vec!["0x01", "0x04"]);

    let (_, body) = get(&app, "/vaults?risk=low&sort=tvl").await?;
    assert_eq!(addresses(&body), vec!["0x02", "0x01"]);

    let (status, _) = get(&app, "/vaults?sort=volume").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_vault_list_cache_invalidated_by_writes() -> Result<()> {
    let (app, state) = create_test_api();

    let (_, first) = get(&app, "/vaults").await?;
    assert_eq!(state.cache.lock().await.len(), 1);

    let vault = serde_json::to_value(make_vault("0x05", "Echo", Strategy::Arbitrage, 0.5, 10.0))?;
    let (status, _) = send_json(&app, "POST", "/vaults", vault).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (_, second) = get(&app, "/vaults").await?;
    assert_eq!(first["total"], 4);
    assert_eq!(second["total"], 5);
    assert_eq!(addresses(&second)[0], "0x05");
    Ok(())
}

#[tokio::test]
async fn test_large_liquidity_survives_listing() -> Result<()> {
    let (app, _) = create_test_api();
    let mut vault = serde_json::to_value(make_vault("0x07", "Golf", Strategy::BlueChip, 0.1, 5.0))?;
    vault["position"] = json!({
        "lowerTick": -600,
        "upperTick": 600,
        "liquidity": 0,
        "tokensOwed0": 0,
        "tokensOwed1": 0
    });
    // Beyond u64::MAX
    let body = vault
        .to_string()
        .replacen("\"liquidity\":0", "\"liquidity\":100000000000000000000000", 1);
    let request = Request::builder()
        .method("POST")
        .uri("/vaults")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))?;
    let (status, _) = send(&app, request).await?;
    assert_eq!(status, StatusCode::CREATED);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/vaults").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let text = String::from_utf8(bytes.to_vec())?;
        assert!(text.contains("\"liquidity\":100000000000000000000000"));
        assert!(text.contains("\"total\":5"));
    }
    Ok(())
}

#[tokio::test]
async fn test_get_update_remove_vault() -> Result<()> {
    let (app, _) = create_test_api();

    let (status, body) = get(&app, "/vaults/0x02").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vault"]["name"], "Alpha");
    assert_eq!(body["vault"]["riskLevel"], "Low");

    let (status, body) = send_json(&app, "PATCH", "/vaults/0x02", json!({"apy": 0.4})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vault"]["apy"], 0.4);
    assert_eq!(body["vault"]["riskLevel"], "High");

    let (status, _) = send_json(&app, "PATCH", "/vaults/0x99", json!({"apy": 0.4})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Request::builder().method("DELETE").uri("/vaults/0x02").body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get(&app, "/vaults/0x02").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
    Ok(())
}

#[tokio::test]
async fn test_replace_vaults_rejects_invalid_collection() -> Result<()> {
    let (app, _) = create_test_api();
    let mut bad = make_vault("0x09", "Bad", Strategy::BlueChip, 0.1, 1.0);
    bad.tvl = -5.0;

    let (status, body) = send_json(&app, "PUT", "/vaults", json!([bad])).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (_, body) = get(&app, "/vaults").await?;
    assert_eq!(body["total"], 4);
    Ok(())
}

#[tokio::test]
async fn test_vault_apr() -> Result<()> {
    let (app, _) = create_test_api();

    // 1,000 fees over 30 days against 1M TVL
    let (status, body) = get(&app, "/vaults/0x01/apr?fees=1000&days=30").await?;
    assert_eq!(status, StatusCode::OK);
    let apr = body["apr"].as_f64().unwrap_or_default();
    assert!((apr - 0.012_166_666).abs() < 1e-6);
    assert!(body["apy"].as_f64().unwrap_or_default() > apr);

    let (_, body) = get(&app, "/vaults/0x01/apr?fees=1000&days=0").await?;
    assert_eq!(body["apr"], 0.0);
    Ok(())
}

#[tokio::test]
async fn test_positions_and_portfolio() -> Result<()> {
    let (app, _) = create_test_api();
    let position = json!({
        "vaultAddress": "0x01",
        "shares": 10.0,
        "depositedAmount": 100.0,
        "currentValue": 125.0,
        "pnl": 0.0,
        "pnlPercentage": 0.0
    });

    let (status, body) = send_json(&app, "POST", "/positions", position).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["pnl"], 25.0);

    let (status, body) = send_json(&app, "PATCH", "/positions/0x01", json!({"currentValue": 90.0})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pnl"], -10.0);

    let (_, body) = get(&app, "/portfolio").await?;
    assert_eq!(body["totalTvl"], 5_250_000.0);
    assert_eq!(body["userTotalValue"], 90.0);
    assert_eq!(body["userTotalPnl"], -10.0);
    assert_eq!(body["positionCount"], 1);

    let (status, _) = send(
        &app,
        Request::builder().method("DELETE").uri("/positions/0x01").body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get(&app, "/positions").await?;
    assert_eq!(body["positions"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn test_prices_and_notifications() -> Result<()> {
    let (app, _) = create_test_api();

    let (status, body) = send_json(&app, "POST", "/prices", json!({"SEI": 0.42})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prices"]["SEI"]["price"], 0.42);

    let (status, _) = send_json(&app, "POST", "/prices", json!({"SEI": -1.0})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The rejected update leaves an error notification behind
    let (_, body) = get(&app, "/notifications").await?;
    assert_eq!(body["unread"], 1);
    assert_eq!(body["notifications"][0]["kind"], "error");

    let (status, _) = send(
        &app,
        Request::builder().method("DELETE").uri("/notifications").body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = get(&app, "/notifications").await?;
    assert_eq!(body["unread"], 0);
    Ok(())
}

#[tokio::test]
async fn test_math_routes() -> Result<()> {
    let (app, _) = create_test_api();

    let (_, body) = get(&app, "/math/tick-to-price?tick=0").await?;
    assert_eq!(body["price"], 1.0);

    let (status, _) = get(&app, "/math/tick-to-price?tick=900000").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&app, "/math/price-to-tick?price=1.0001").await?;
    assert_eq!(body["nearestTick"], 1);

    let (status, _) = get(&app, "/math/price-to-tick?price=0").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&app, "/math/align?tick=-5&spacing=10").await?;
    assert_eq!(body["alignedTick"], -10);

    let (status, _) = get(&app, "/math/align?tick=5&spacing=0").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(&app, "/math/price-range?lower=0.9&upper=1.1&spacing=60").await?;
    assert_eq!(status, StatusCode::OK);
    let lower = body["lowerTick"].as_i64().unwrap_or_default();
    let upper = body["upperTick"].as_i64().unwrap_or_default();
    assert_eq!(lower % 60, 0);
    assert_eq!(upper % 60, 0);
    assert!(body["lowerPrice"].as_f64().unwrap_or(1.0) <= 0.9);
    assert!(body["upperPrice"].as_f64().unwrap_or(0.0) >= 1.1);
    Ok(())
}

#[tokio::test]
async fn test_gas_estimates() -> Result<()> {
    let (app, _) = create_test_api();

    let (_, body) = get(&app, "/gas/swap").await?;
    assert_eq!(body["cost"], 0.001);
    assert_eq!(body["known"], true);

    let (_, body) = get(&app, "/gas/teleport").await?;
    assert_eq!(body["cost"], 0.002);
    assert_eq!(body["known"], false);
    Ok(())
}

#[tokio::test]
async fn test_rebalance_analysis_uses_vault_spacing() -> Result<()> {
    let (app, _) = create_test_api();
    let request = json!({
        "vaultAddress": "0x01",
        "currentTick": 1000,
        "lowerTick": -6000,
        "upperTick": 6000,
        "utilizationRate": 0.2
    });

    let (status, body) = send_json(&app, "POST", "/analyze/rebalance", request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tickSpacing"], 60);
    assert_eq!(body["action"], "rebalance_required");
    assert_eq!(body["newLowerTick"], -3240);
    assert_eq!(body["newUpperTick"], 5160);

    let hold = json!({
        "currentTick": 0,
        "lowerTick": -600,
        "upperTick": 600,
        "utilizationRate": 0.9
    });
    let (_, body) = send_json(&app, "POST", "/analyze/rebalance", hold).await?;
    assert_eq!(body["action"], "hold_position");
    Ok(())
}

#[tokio::test]
async fn test_rebalance_rejects_ticks_outside_domain() -> Result<()> {
    let (app, _) = create_test_api();
    let request = json!({
        "currentTick": 0,
        "lowerTick": -2_000_000_000,
        "upperTick": 2_000_000_000,
        "utilizationRate": 0.1
    });

    let (status, body) = send_json(&app, "POST", "/analyze/rebalance", request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (_, body) = send_json(
        &app,
        "POST",
        "/analyze/rebalance",
        json!({"currentTick": 0, "lowerTick": -600, "upperTick": 600, "utilizationRate": 0.5}),
    )
    .await?;
    assert_eq!(body["riskAssessment"], "Moderate inefficiency - rebalancing beneficial");
    Ok(())
}

#[tokio::test]
async fn test_risk_analysis_uses_vault_tvl() -> Result<()> {
    let (app, _) = create_test_api();

    // 0x02 holds 3M TVL, deep enough for the lowest liquidity risk
    let (status, body) = send_json(
        &app,
        "POST",
        "/analyze/risk",
        json!({"vaultAddress": "0x02", "volatility": 0.1, "correlation": 0.9}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["components"]["liquidityRisk"], 0.1);
    assert_eq!(body["riskLevel"], "Low");
    assert_eq!(body["vaultAddress"], "0x02");

    let (_, body) = send_json(&app, "POST", "/analyze/risk", json!({})).await?;
    assert_eq!(body["riskLevel"], "Medium");
    assert_eq!(body["recommendations"].as_array().map(Vec::len), Some(4));

    let (status, _) = send_json(&app, "POST", "/analyze/risk", json!({"correlation": 2.0})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_optimal_range_prediction() -> Result<()> {
    let (app, _) = create_test_api();
    let request = json!({
        "currentPrice": 1.0,
        "volume24h": 2_000_000.0,
        "volatility": 0.5,
        "liquidity": 5_000_000.0
    });

    let (status, body) = send_json(&app, "POST", "/predict/optimal-range", request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tickSpacing"], 60);
    assert_eq!(body["lowerTick"], -300);
    assert_eq!(body["upperTick"], 300);

    let (status, _) = send_json(
        &app,
        "POST",
        "/predict/optimal-range",
        json!({"currentPrice": -1.0, "volume24h": 0.0, "volatility": 0.5, "liquidity": 0.0}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_rejects_over_budget() -> Result<()> {
    let mut config = ApiServiceConfig::default();
    config.rate_limit.max_requests = 3;
    let (app, _) = create_test_api_with(config);

    let request = |client: &str| {
        Request::builder()
            .uri("/gas/swap")
            .header("x-forwarded-for", client)
            .body(Body::empty())
    };

    for expected_remaining in ["2", "1", "0"] {
        let response = app.clone().oneshot(request("10.0.0.1")?).await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-remaining"], expected_remaining);
    }

    let response = app.clone().oneshot(request("10.0.0.1")?).await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));

    // Other clients keep their own budget, health stays exempt
    let response = app.clone().oneshot(request("10.0.0.2")?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let (status, _) = get(&app, "/health").await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
