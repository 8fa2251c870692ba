use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use shared_database::supabase::SupabaseClient;

use crate::models::ServiceEvent;
use crate::time::parse_timestamp;

/// Read-only access to the historical event log.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Events of one service point at or after `since`, oldest first, at most `limit`.
    async fn events_since(
        &self,
        service_point_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<ServiceEvent>>;
}

#[derive(Debug, Deserialize)]
struct ScreeningRecordRow {
    spid: Option<String>,
    modify_time: Option<String>,
}

/// Reads service events from the `screening_records` table.
pub struct SupabaseEventStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseEventStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl EventStore for SupabaseEventStore {
    async fn events_since(
        &self,
        service_point_id: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<ServiceEvent>> {
        debug!("Fetching screening records for {} since {}", service_point_id, since);

        let params = [
            ("select", "modify_time,spid".to_string()),
            ("spid", format!("eq.{}", service_point_id)),
            ("modify_time", format!("gte.{}", since.to_rfc3339_opts(SecondsFormat::Secs, true))),
            ("order", "modify_time.asc".to_string()),
            ("limit", limit.to_string()),
        ];

        let rows: Vec<ScreeningRecordRow> = self.supabase
            .select("screening_records", &params)
            .await?;

        let total = rows.len();
        let events: Vec<ServiceEvent> = rows
            .into_iter()
            .filter_map(|row| {
                let timestamp = row.modify_time.as_deref().and_then(parse_timestamp)?;
                let spid = row.spid.unwrap_or_else(|| service_point_id.to_string());
                Some(ServiceEvent::new(spid, timestamp))
            })
            .collect();

        if events.len() < total {
            warn!(
                "Skipped {} screening records without a usable modify_time",
                total - events.len()
            );
        }

        Ok(events)
    }
}
