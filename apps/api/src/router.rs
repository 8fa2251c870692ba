use std::sync::Arc;

use axum::{
    Json,
    Router,
    routing::get,
};
use serde_json::{json, Value};

use daily_insights_cell::{create_daily_insights_router, InsightHandlers};
use wait_prediction_cell::{create_wait_prediction_router, WaitPredictionHandlers};

pub fn create_router(
    wait_prediction: Arc<WaitPredictionHandlers>,
    insights: Arc<InsightHandlers>,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(create_wait_prediction_router(wait_prediction))
        .merge(create_daily_insights_router(insights))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
