// ✅ Daily Insights Cell - executive summary for clinic administrators
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::InsightError;
pub use models::{
    DailyInsightsRequest,
    DailyInsightsResponse,
    DailyMetricsSnapshot,
    InsightResult,
};

pub use handlers::InsightHandlers;
pub use router::create_daily_insights_router;

// ✅ Public services API
pub mod api {
    pub use crate::services::fallback::fallback_insights;
    pub use crate::services::gemini::{GeminiProvider, GenerationProvider};
    pub use crate::services::synthesizer::InsightSynthesizer;
}
