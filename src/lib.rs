//! Single-target 3D tracking pipeline.
//!
//! Noisy position samples go in once per cycle; a smoothed, disturbance
//! compensated correction vector comes out. See `controller::TrackingController`.

pub mod config;
pub mod controller;
pub mod error;
pub mod filters;
pub mod motion;
pub mod prediction;
pub mod profile;
pub mod recording;
pub mod shaping;
pub mod types;

pub use config::TrackerConfig;
pub use controller::{CycleOutcome, CycleReport, TrackerSnapshot, TrackingController, TrackingPhase};
pub use error::{TrackerError, TrackerResult};
pub use profile::{Profile, ProfileKind, ProfileSelection};
pub use types::Vector3;
