use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Read-only PostgREST client authenticated with the service role key.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_role_key: config.supabase_service_role_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.service_role_key.is_empty()
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.service_role_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_role_key))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    /// `GET /rest/v1/{table}` with PostgREST filters passed as query pairs,
    /// e.g. `("spid", "eq.A")` or `("order", "modify_time.asc")`.
    pub async fn select<T>(&self, table: &str, params: &[(&str, String)]) -> Result<Vec<T>>
    where T: DeserializeOwned {
        if !self.is_configured() {
            return Err(anyhow!("SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY are required"));
        }

        let url = format!("{}/rest/v1/{}", self.base_url, table);
        debug!("Making request to {}", url);

        let response = self.client.request(Method::GET, &url)
            .headers(self.get_headers()?)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let rows = response.json::<Vec<T>>().await?;
        Ok(rows)
    }
}
