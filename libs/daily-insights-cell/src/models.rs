use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const NOT_AVAILABLE: &str = "N/A";

/// Aggregate figures for one operating day, as computed by the reporting side.
/// Every field is optional on the wire; `null` is treated like a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyMetricsSnapshot {
    #[serde(deserialize_with = "lenient_count")]
    pub total_visits: u64,
    #[serde(deserialize_with = "lenient_minutes")]
    pub avg_wait: f64,
    #[serde(deserialize_with = "lenient_label")]
    pub peak_time: String,
    #[serde(alias = "top_overloaded_spid", deserialize_with = "lenient_label")]
    pub top_overloaded_service_point: String,
    #[serde(deserialize_with = "lenient_label")]
    pub top_doctor_queue: String,
    #[serde(deserialize_with = "lenient_optional_minutes")]
    pub yesterday_avg_wait: Option<f64>,
}

impl Default for DailyMetricsSnapshot {
    fn default() -> Self {
        Self {
            total_visits: 0,
            avg_wait: 0.0,
            peak_time: NOT_AVAILABLE.to_string(),
            top_overloaded_service_point: NOT_AVAILABLE.to_string(),
            top_doctor_queue: NOT_AVAILABLE.to_string(),
            yesterday_avg_wait: None,
        }
    }
}

/// Executive summary plus 3 to 6 concrete actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightResult {
    pub executive_summary: String,
    pub bullet_actions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyInsightsRequest {
    pub date: String,
    #[serde(default)]
    pub metrics: DailyMetricsSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyInsightsResponse {
    pub executive_summary: String,
    pub bullet_actions: Vec<String>,
}

impl From<InsightResult> for DailyInsightsResponse {
    fn from(result: InsightResult) -> Self {
        Self {
            executive_summary: result.executive_summary,
            bullet_actions: result.bullet_actions,
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where D: Deserializer<'de> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(as_number)
        .map(|n| n.max(0.0) as u64)
        .unwrap_or(0))
}

fn lenient_minutes<'de, D>(deserializer: D) -> Result<f64, D::Error>
where D: Deserializer<'de> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_number).unwrap_or(0.0))
}

fn lenient_optional_minutes<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where D: Deserializer<'de> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_number))
}

fn lenient_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}
