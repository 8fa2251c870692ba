pub mod doctor_directory;
pub mod estimator;
pub mod event_store;
pub mod predictor;

pub use doctor_directory::{DoctorDirectory, SupabaseDoctorDirectory};
pub use estimator::ServiceTimeEstimator;
pub use event_store::{EventStore, SupabaseEventStore};
pub use predictor::{Clock, WaitPredictor};
