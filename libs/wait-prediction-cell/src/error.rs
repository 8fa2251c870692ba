use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum WaitPredictionError {
    #[error("service_point_id or doctor_id is required")]
    MissingServicePoint,

    #[error("Invalid current_time format: {0}")]
    InvalidTimestamp(String),
}

impl From<WaitPredictionError> for AppError {
    fn from(err: WaitPredictionError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
