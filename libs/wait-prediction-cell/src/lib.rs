// =====================================================================================
// WAIT PREDICTION CELL
// =====================================================================================
//
// Per service point and hour of day, infers the average time a patient spends at the
// counter from today's screening records, then turns a queue depth into a predicted
// wait with a fixed +/-20% band.
//
// =====================================================================================

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod time;

pub use error::WaitPredictionError;
pub use models::{PredictWaitRequest, PredictWaitResponse, ServiceEvent, WaitPrediction};
pub use services::{
    Clock, DoctorDirectory, EventStore, ServiceTimeEstimator, SupabaseDoctorDirectory,
    SupabaseEventStore, WaitPredictor,
};

pub use handlers::WaitPredictionHandlers;
pub use router::create_wait_prediction_router;
