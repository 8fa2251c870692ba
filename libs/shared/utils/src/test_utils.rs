use serde_json::{json, Value};

use shared_config::AppConfig;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_service_role_key: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: String,
    pub allow_gemini_fallback: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_role_key: "test-service-role-key".to_string(),
            gemini_api_key: Some("test-gemini-key".to_string()),
            gemini_model: None,
            gemini_base_url: "http://localhost:54322".to_string(),
            allow_gemini_fallback: true,
        }
    }
}

impl TestConfig {
    /// Points both Supabase and Gemini at the same mock server.
    pub fn for_mock_server(uri: &str) -> Self {
        Self {
            supabase_url: uri.to_string(),
            gemini_base_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.gemini_model = Some(model.to_string());
        self
    }

    pub fn without_gemini_key(mut self) -> Self {
        self.gemini_api_key = None;
        self
    }

    pub fn with_fallback(mut self, allow: bool) -> Self {
        self.allow_gemini_fallback = allow;
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_role_key: self.supabase_service_role_key.clone(),
            gemini_api_key: self.gemini_api_key.clone(),
            gemini_model: self.gemini_model.clone(),
            gemini_base_url: self.gemini_base_url.clone(),
            allow_gemini_fallback: self.allow_gemini_fallback,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            server_port: 8000,
        }
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    /// Rows of `screening_records` as PostgREST returns them.
    pub fn screening_records(spid: &str, modify_times: &[&str]) -> Value {
        Value::Array(
            modify_times
                .iter()
                .map(|time| json!({ "spid": spid, "modify_time": time }))
                .collect(),
        )
    }

    pub fn doctor_row(spid: &str) -> Value {
        json!([{ "spid": spid }])
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "message": message,
            "code": code
        })
    }
}

pub struct MockGeminiResponses;

impl MockGeminiResponses {
    /// A `generateContent` body whose first candidate carries `parts` as text fragments.
    pub fn generate_content(parts: &[&str]) -> Value {
        json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": parts.iter().map(|text| json!({ "text": text })).collect::<Vec<_>>()
                },
                "finishReason": "STOP"
            }]
        })
    }

    pub fn insight_json(summary: &str, actions: &[&str]) -> String {
        json!({
            "executive_summary": summary,
            "bullet_actions": actions
        })
        .to_string()
    }

    pub fn model_not_found(model: &str) -> Value {
        json!({
            "error": {
                "code": 404,
                "message": format!("models/{} is not found for API version v1beta", model),
                "status": "NOT_FOUND"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default().to_app_config();

        assert_eq!(config.supabase_url, "http://localhost:54321");
        assert!(config.is_configured());
        assert!(config.is_gemini_configured());
        assert!(config.allow_gemini_fallback);
    }

    #[test]
    fn test_mock_server_config() {
        let config = TestConfig::for_mock_server("http://127.0.0.1:9999")
            .with_model("gemini-test")
            .without_gemini_key()
            .with_fallback(false)
            .to_app_config();

        assert_eq!(config.gemini_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.gemini_model.as_deref(), Some("gemini-test"));
        assert!(!config.is_gemini_configured());
        assert!(!config.allow_gemini_fallback);
    }

    #[test]
    fn test_generate_content_shape() {
        let body = MockGeminiResponses::generate_content(&["{\"a\":", "1}"]);
        assert_eq!(body["candidates"][0]["content"]["parts"][1]["text"], "1}");
    }
}
