pub mod error;
pub mod estimator;
pub mod snapshot;
