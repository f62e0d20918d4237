//! API route definitions

use super::{handlers::*, ApiState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create vault-related routes
pub fn create_vault_routes() -> Router<ApiState> {
    Router::new()
        .route("/vaults", get(list_vaults).put(replace_vaults).post(add_vault))
        .route(
            "/vaults/:address",
            get(get_vault).patch(update_vault).delete(remove_vault),
        )
        .route("/vaults/:address/apr", get(get_vault_apr))
}

/// Create user-position routes
pub fn create_position_routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/positions",
            get(list_positions).put(replace_positions).post(add_position),
        )
        .route(
            "/positions/:vault_address",
            axum::routing::patch(update_position).delete(remove_position),
        )
        .route("/portfolio", get(get_portfolio))
}

/// Create price, notification and estimator routes
pub fn create_market_routes() -> Router<ApiState> {
    Router::new()
        .route("/prices", get(get_prices).post(update_prices))
        .route(
            "/notifications",
            get(list_notifications).delete(clear_notifications),
        )
        .route("/gas/:operation", get(get_gas_estimate))
        .route("/analyze/rebalance", post(analyze_rebalance))
        .route("/analyze/risk", post(analyze_risk))
        .route("/predict/optimal-range", post(predict_optimal_range))
}

/// Create tick/price math routes
pub fn create_math_routes() -> Router<ApiState> {
    Router::new()
        .route("/math/tick-to-price", get(tick_to_price))
        .route("/math/price-to-tick", get(price_to_tick))
        .route("/math/align", get(align_tick))
        .route("/math/price-range", get(price_range))
}
