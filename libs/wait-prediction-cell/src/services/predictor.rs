use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use tracing::{debug, info, warn};

use crate::error::WaitPredictionError;
use crate::models::{PredictWaitRequest, WaitPrediction};
use crate::services::doctor_directory::DoctorDirectory;
use crate::services::estimator::ServiceTimeEstimator;
use crate::time::parse_timestamp;

/// Source of the server's notion of "now".
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct WaitPredictor {
    estimator: ServiceTimeEstimator,
    doctors: Arc<dyn DoctorDirectory>,
    clock: Clock,
}

impl WaitPredictor {
    pub fn new(estimator: ServiceTimeEstimator, doctors: Arc<dyn DoctorDirectory>) -> Self {
        Self::with_clock(estimator, doctors, Arc::new(Utc::now))
    }

    pub fn with_clock(
        estimator: ServiceTimeEstimator,
        doctors: Arc<dyn DoctorDirectory>,
        clock: Clock,
    ) -> Self {
        Self { estimator, doctors, clock }
    }

    pub async fn predict(
        &self,
        request: &PredictWaitRequest,
    ) -> Result<WaitPrediction, WaitPredictionError> {
        let service_point_id = self.resolve_service_point(request).await?;

        let requested_at = parse_timestamp(&request.current_time)
            .ok_or_else(|| WaitPredictionError::InvalidTimestamp(request.current_time.clone()))?;

        // The caller's clock only picks the hour; "today" is the server's.
        let service_minutes = self.estimator
            .estimate(&service_point_id, requested_at.hour(), (self.clock)())
            .await;

        let prediction = WaitPrediction::from_estimate(service_minutes, request.patients_ahead);
        info!(
            "Predicted {} min for {} patients at {} ({} min each)",
            prediction.predicted_minutes, request.patients_ahead, service_point_id, service_minutes
        );

        Ok(prediction)
    }

    /// A direct service point wins; otherwise the doctor's service point is looked up.
    async fn resolve_service_point(
        &self,
        request: &PredictWaitRequest,
    ) -> Result<String, WaitPredictionError> {
        if let Some(service_point_id) = non_blank(request.service_point_id.as_deref()) {
            return Ok(service_point_id.to_string());
        }

        let doctor_id = non_blank(request.doctor_id.as_deref())
            .ok_or(WaitPredictionError::MissingServicePoint)?;

        debug!("Looking up service point for doctor: {}", doctor_id);
        match self.doctors.service_point_for(doctor_id).await {
            Ok(Some(service_point_id)) => Ok(service_point_id),
            Ok(None) => Err(WaitPredictionError::MissingServicePoint),
            Err(e) => {
                warn!("Doctor lookup failed for {}: {}", doctor_id, e);
                Err(WaitPredictionError::MissingServicePoint)
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
