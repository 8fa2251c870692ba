use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
};
use tracing::info;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{DailyInsightsRequest, DailyInsightsResponse};
use crate::services::{GenerationProvider, InsightSynthesizer};

pub struct InsightHandlers {
    synthesizer: InsightSynthesizer,
}

impl InsightHandlers {
    pub fn new(config: &AppConfig, provider: Option<Arc<dyn GenerationProvider>>) -> Self {
        Self::with_synthesizer(InsightSynthesizer::from_config(config, provider))
    }

    pub fn with_synthesizer(synthesizer: InsightSynthesizer) -> Self {
        Self { synthesizer }
    }
}

/// Executive summary and action list for one operating day
pub async fn daily_insights(
    State(handlers): State<Arc<InsightHandlers>>,
    Json(request): Json<DailyInsightsRequest>,
) -> Result<Json<DailyInsightsResponse>, AppError> {
    info!("Daily insights request for {}", request.date);

    let result = handlers.synthesizer
        .synthesize(&request.date, &request.metrics)
        .await?;

    Ok(Json(result.into()))
}
