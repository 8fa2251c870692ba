use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::InsightError;

/// Tried in order after the operator's configured model.
pub const DEFAULT_MODEL_CANDIDATES: [&str; 3] = [
    "gemini-2.0-flash-lite",
    "gemini-2.0-flash",
    "gemini-1.5-flash-latest",
];
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);
pub const TEMPERATURE: f64 = 0.3;

/// Remote text generation. Implementations must report an unknown model as
/// `InsightError::ModelNotFound` so callers can move on to the next candidate.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, InsightError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

/// `generateContent` response; only the fields we read.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// All text fragments of the first candidate, joined and trimmed.
    pub fn text(&self) -> Result<String, InsightError> {
        let candidate = self.candidates.first().ok_or(InsightError::NoCandidates)?;

        let text: String = candidate
            .content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect();

        let text = text.trim();
        if text.is_empty() {
            return Err(InsightError::EmptyResponse);
        }

        Ok(text.to_string())
    }
}

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config
            .gemini_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("GEMINI_API_KEY not set"))?;

        Self::new(&config.gemini_base_url, api_key)
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, InsightError> {
        debug!("Requesting generateContent from model {}", model);

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: "application/json",
            },
        };

        let response = self.client
            .post(self.endpoint(model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| InsightError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Model {} not found", model);
            return Err(InsightError::ModelNotFound(model.to_string()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error ({}): {}", status, error_text);
            return Err(InsightError::Http {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| InsightError::InvalidResponse(e.without_url().to_string()))?;

        payload.text()
    }
}
