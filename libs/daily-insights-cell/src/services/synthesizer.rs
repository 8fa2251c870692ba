use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use shared_config::AppConfig;

use crate::error::InsightError;
use crate::models::{DailyMetricsSnapshot, InsightResult};
use crate::services::fallback::fallback_insights;
use crate::services::gemini::{GenerationProvider, DEFAULT_MODEL_CANDIDATES};
use crate::services::parser::parse_insights;
use crate::services::prompt::build_prompt;

pub struct InsightSynthesizer {
    provider: Option<Arc<dyn GenerationProvider>>,
    model_candidates: Vec<String>,
    allow_fallback: bool,
}

impl InsightSynthesizer {
    pub fn new(
        provider: Option<Arc<dyn GenerationProvider>>,
        configured_model: Option<&str>,
        allow_fallback: bool,
    ) -> Self {
        Self {
            provider,
            model_candidates: model_candidates(configured_model),
            allow_fallback,
        }
    }

    pub fn from_config(config: &AppConfig, provider: Option<Arc<dyn GenerationProvider>>) -> Self {
        Self::new(provider, config.gemini_model.as_deref(), config.allow_gemini_fallback)
    }

    /// Model-written insights, or the template when the model path fails and the
    /// fallback is enabled.
    #[instrument(skip(self, metrics))]
    pub async fn synthesize(
        &self,
        date: &str,
        metrics: &DailyMetricsSnapshot,
    ) -> Result<InsightResult, InsightError> {
        match self.generate_remote(date, metrics).await {
            Ok(result) => Ok(result),
            Err(e) if self.allow_fallback => {
                warn!("Daily insights falling back to template: {}", e);
                Ok(fallback_insights(date, metrics))
            }
            Err(e) => {
                error!("Daily insights unavailable and fallback disabled: {}", e);
                Err(e)
            }
        }
    }

    pub async fn generate_remote(
        &self,
        date: &str,
        metrics: &DailyMetricsSnapshot,
    ) -> Result<InsightResult, InsightError> {
        let provider = self.provider.as_ref().ok_or(InsightError::MissingApiKey)?;
        let prompt = build_prompt(date, metrics);

        let text = self.first_available(provider.as_ref(), &prompt).await?;
        parse_insights(&text)
    }

    /// Walks the candidates in order. Only an unknown model moves on; any other
    /// failure ends the walk.
    async fn first_available(
        &self,
        provider: &dyn GenerationProvider,
        prompt: &str,
    ) -> Result<String, InsightError> {
        for model in &self.model_candidates {
            match provider.generate(model, prompt).await {
                Ok(text) => {
                    info!("Daily insights generated with model {}", model);
                    return Ok(text);
                }
                Err(InsightError::ModelNotFound(_)) => {
                    debug!("Model {} not available, trying next candidate", model);
                }
                Err(e) => return Err(e),
            }
        }

        Err(InsightError::NoSupportedModel)
    }
}

/// Configured model first, then the defaults; blanks dropped, first occurrence kept.
pub fn model_candidates(configured_model: Option<&str>) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    for model in configured_model.into_iter().chain(DEFAULT_MODEL_CANDIDATES) {
        let model = model.trim();
        if !model.is_empty() && !candidates.iter().any(|c| c == model) {
            candidates.push(model.to_string());
        }
    }

    candidates
}
