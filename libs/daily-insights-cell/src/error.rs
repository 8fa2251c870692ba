use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("GEMINI_API_KEY is required for daily insights")]
    MissingApiKey,

    #[error("Gemini model {0} is not available")]
    ModelNotFound(String),

    #[error("Gemini API request failed with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Gemini API network error: {0}")]
    Network(String),

    #[error("Gemini API returned an unreadable response: {0}")]
    InvalidResponse(String),

    #[error("Gemini API returned no candidates")]
    NoCandidates,

    #[error("Gemini API returned an empty response")]
    EmptyResponse,

    #[error("Gemini response is not valid JSON: {0}")]
    MalformedOutput(String),

    #[error("Gemini response missing executive_summary")]
    MissingSummary,

    #[error("Gemini response must include at least 3 bullet_actions, got {0}")]
    TooFewActions(usize),

    #[error("No supported Gemini model found. Set GEMINI_MODEL to a model available to your account.")]
    NoSupportedModel,
}

impl From<InsightError> for AppError {
    fn from(err: InsightError) -> Self {
        AppError::ExternalService(err.to_string())
    }
}
