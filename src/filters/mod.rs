pub mod adaptive_kalman;

pub use adaptive_kalman::{AdaptiveNoiseEstimator, AxisFilters};
