use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use shared_database::supabase::SupabaseClient;

/// Maps a doctor to the service point whose queue they serve.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    async fn service_point_for(&self, doctor_id: &str) -> Result<Option<String>>;
}

#[derive(Debug, Deserialize)]
struct DoctorRow {
    spid: Option<String>,
}

pub struct SupabaseDoctorDirectory {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseDoctorDirectory {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl DoctorDirectory for SupabaseDoctorDirectory {
    async fn service_point_for(&self, doctor_id: &str) -> Result<Option<String>> {
        debug!("Resolving service point for doctor: {}", doctor_id);

        let params = [
            ("select", "spid".to_string()),
            ("id", format!("eq.{}", doctor_id)),
            ("limit", "1".to_string()),
        ];

        let rows: Vec<DoctorRow> = self.supabase.select("doctors", &params).await?;

        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.spid)
            .map(|spid| spid.trim().to_string())
            .filter(|spid| !spid.is_empty()))
    }
}
