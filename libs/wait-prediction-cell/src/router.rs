use std::sync::Arc;

use axum::{
    routing::post,
    Router,
};

use crate::handlers::{predict_wait, WaitPredictionHandlers};

pub fn create_wait_prediction_router(handlers: Arc<WaitPredictionHandlers>) -> Router {
    Router::new()
        .route("/predict-wait", post(predict_wait))
        .with_state(handlers)
}
