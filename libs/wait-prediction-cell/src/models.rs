use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed interaction at a service point.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEvent {
    pub service_point_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ServiceEvent {
    pub fn new(service_point_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            service_point_id: service_point_id.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaitPrediction {
    pub predicted_minutes: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
}

impl WaitPrediction {
    /// Multiplies the per-patient estimate by the queue depth and wraps the result
    /// in a fixed +/-20% band. An empty queue is always exactly zero.
    pub fn from_estimate(service_minutes: f64, patients_ahead: u32) -> Self {
        let predicted_minutes = if patients_ahead == 0 {
            0.0
        } else {
            round_tenth(service_minutes * f64::from(patients_ahead))
        };

        Self {
            predicted_minutes,
            confidence_low: round_tenth((predicted_minutes * 0.8).max(0.0)),
            confidence_high: round_tenth(predicted_minutes * 1.2),
        }
    }
}

pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictWaitRequest {
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default, alias = "spid")]
    pub service_point_id: Option<String>,
    pub patients_ahead: u32,
    pub current_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictWaitResponse {
    pub predicted_minutes: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
}

impl From<WaitPrediction> for PredictWaitResponse {
    fn from(prediction: WaitPrediction) -> Self {
        Self {
            predicted_minutes: prediction.predicted_minutes,
            confidence_low: prediction.confidence_low,
            confidence_high: prediction.confidence_high,
        }
    }
}
