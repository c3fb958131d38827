//! Tunable constants of the tracking pipeline.
//!
//! Profiles carry the per-target gains; everything else lives here.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    // ── Per-axis adaptive filter ──
    pub filter_r: f64,
    pub filter_q: f64,
    pub speed_window: usize,
    pub speed_noise_gain: f64,

    // ── Motion estimation ──
    pub history_capacity: usize,
    /// Lower bound on the sample interval [seconds]
    pub min_dt: f64,

    // ── Prediction ──
    pub prediction_horizon: f64,

    // ── Response shaping ──
    pub velocity_compensation_constant: f64,
    pub snap_gain: f64,
    pub velocity_gain_slope: f64,
    pub velocity_gain_cap: f64,

    // ── Cycle skipping ──
    pub adaptive_skip: bool,
    pub stationary_speed: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            filter_r: 0.003,
            filter_q: 0.0005,
            speed_window: 5,
            speed_noise_gain: 0.1,
            history_capacity: 8,
            min_dt: 0.001,
            prediction_horizon: 0.05,
            velocity_compensation_constant: 0.01,
            snap_gain: 2.0,
            velocity_gain_slope: 10.0,
            velocity_gain_cap: 3.0,
            adaptive_skip: true,
            stationary_speed: 0.01,
        }
    }
}

impl TrackerConfig {
    /// Load a config from JSON. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> TrackerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: TrackerConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TrackerResult<()> {
        let non_negative = [
            ("filter_r", self.filter_r),
            ("filter_q", self.filter_q),
            ("speed_noise_gain", self.speed_noise_gain),
            ("prediction_horizon", self.prediction_horizon),
            ("velocity_compensation_constant", self.velocity_compensation_constant),
            ("snap_gain", self.snap_gain),
            ("velocity_gain_slope", self.velocity_gain_slope),
            ("stationary_speed", self.stationary_speed),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackerError::InvalidConfig(format!(
                    "{} must be finite and >= 0 (got {})",
                    name, value
                )));
            }
        }

        if !self.min_dt.is_finite() || self.min_dt <= 0.0 {
            return Err(TrackerError::InvalidConfig(format!(
                "min_dt must be finite and > 0 (got {})",
                self.min_dt
            )));
        }
        if !self.velocity_gain_cap.is_finite() || self.velocity_gain_cap < 1.0 {
            return Err(TrackerError::InvalidConfig(format!(
                "velocity_gain_cap must be finite and >= 1 (got {})",
                self.velocity_gain_cap
            )));
        }
        if self.speed_window == 0 {
            return Err(TrackerError::InvalidConfig("speed_window must be > 0".into()));
        }
        if self.history_capacity == 0 {
            return Err(TrackerError::InvalidConfig("history_capacity must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TrackerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_min_dt() {
        let config = TrackerConfig { min_dt: 0.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(TrackerError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_nan_gain() {
        let config = TrackerConfig { snap_gain: f64::NAN, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_windows() {
        let config = TrackerConfig { speed_window: 0, ..Default::default() };
        assert!(config.validate().is_err());
        let config = TrackerConfig { history_capacity: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{ "prediction_horizon": 0.1, "adaptive_skip": false }"#).unwrap();
        assert_eq!(config.prediction_horizon, 0.1);
        assert!(!config.adaptive_skip);
        assert_eq!(config.history_capacity, 8);
        assert_eq!(config.filter_r, 0.003);
    }
}
