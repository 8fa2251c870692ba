use std::sync::Arc;

use axum::{
    routing::post,
    Router,
};

use crate::handlers::{daily_insights, InsightHandlers};

pub fn create_daily_insights_router(handlers: Arc<InsightHandlers>) -> Router {
    Router::new()
        .route("/daily-insights", post(daily_insights))
        .with_state(handlers)
}
