use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
};
use chrono::Utc;
use tracing::info;

use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{PredictWaitRequest, PredictWaitResponse};
use crate::services::{
    Clock, ServiceTimeEstimator, SupabaseDoctorDirectory, SupabaseEventStore, WaitPredictor,
};

pub struct WaitPredictionHandlers {
    predictor: WaitPredictor,
}

impl WaitPredictionHandlers {
    /// Wires the predictor to the Supabase-backed store and doctor directory.
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self::with_clock(supabase, Arc::new(Utc::now))
    }

    pub fn with_clock(supabase: Arc<SupabaseClient>, clock: Clock) -> Self {
        let estimator = ServiceTimeEstimator::new(Arc::new(SupabaseEventStore::new(supabase.clone())));
        let doctors = Arc::new(SupabaseDoctorDirectory::new(supabase));

        Self::with_predictor(WaitPredictor::with_clock(estimator, doctors, clock))
    }

    pub fn with_predictor(predictor: WaitPredictor) -> Self {
        Self { predictor }
    }
}

/// Predict the wait for a patient given how many people are ahead of them
pub async fn predict_wait(
    State(handlers): State<Arc<WaitPredictionHandlers>>,
    Json(request): Json<PredictWaitRequest>,
) -> Result<Json<PredictWaitResponse>, AppError> {
    info!(
        "Wait prediction request: service_point={:?} doctor={:?} patients_ahead={}",
        request.service_point_id, request.doctor_id, request.patients_ahead
    );

    let prediction = handlers.predictor.predict(&request).await?;

    Ok(Json(prediction.into()))
}
