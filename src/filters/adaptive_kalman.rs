/// Scalar Kalman filter with speed-adaptive measurement noise
///
/// Model: identity transition (A = 1), direct observation (C = 1).
/// The measurement noise is re-derived every update from the mean of the
/// last few observed speeds:
///
///   R_adaptive = R * (1 + mean(speeds) * k)
///
/// Slow targets get a small R (smooth output); fast targets push R up.
/// Velocity is not part of the filter state, it is estimated upstream and
/// only fed in as the speed hint.

use serde::Serialize;

use crate::config::TrackerConfig;
use crate::types::{RingBuffer, Vector3};

const DEFAULT_R: f64 = 0.005;
const DEFAULT_Q: f64 = 0.0008;
const DEFAULT_SPEED_GAIN: f64 = 0.1;
const DEFAULT_SPEED_WINDOW: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScalarEstimate {
    pub estimate: f64,
    pub covariance: f64,
}

#[derive(Clone, Debug)]
pub struct AdaptiveNoiseEstimator {
    /// None until the first measurement arrives
    state: Option<ScalarEstimate>,

    /// Base measurement noise
    r: f64,

    /// Process noise
    q: f64,

    /// Slope of R against mean speed
    speed_gain: f64,

    speeds: RingBuffer<f64>,
    adaptive_r: f64,
}

impl AdaptiveNoiseEstimator {
    pub fn new(r: f64, q: f64) -> Self {
        Self::with_window(r, q, DEFAULT_SPEED_GAIN, DEFAULT_SPEED_WINDOW)
    }

    pub fn with_window(r: f64, q: f64, speed_gain: f64, window: usize) -> Self {
        Self {
            state: None,
            r,
            q,
            speed_gain,
            speeds: RingBuffer::new(window),
            adaptive_r: r,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::with_window(
            config.filter_r,
            config.filter_q,
            config.speed_noise_gain,
            config.speed_window,
        )
    }

    /// Record a speed sample and recompute the adaptive measurement noise.
    pub fn update(&mut self, observed_speed: f64) {
        // Non-finite speeds would poison R for the whole window
        let speed = if observed_speed.is_finite() { observed_speed } else { 0.0 };
        self.speeds.push(speed);
        self.adaptive_r = self.r * (1.0 + self.speeds.mean() * self.speed_gain);
    }

    /// Run one predict/update step and return the new estimate.
    ///
    /// The first call seeds the filter and returns `measurement` unchanged.
    pub fn filter(&mut self, measurement: f64, observed_speed: f64) -> f64 {
        self.update(observed_speed);

        let Some(prev) = self.state else {
            self.state = Some(ScalarEstimate {
                estimate: measurement,
                covariance: self.adaptive_r,
            });
            return measurement;
        };

        // Predict
        let pred_x = prev.estimate;
        let pred_cov = prev.covariance + self.q;

        // Update
        let gain = pred_cov / (pred_cov + self.adaptive_r);
        let estimate = pred_x + gain * (measurement - pred_x);
        let covariance = pred_cov * (1.0 - gain);

        self.state = Some(ScalarEstimate { estimate, covariance });
        estimate
    }

    pub fn estimate(&self) -> Option<f64> {
        self.state.map(|s| s.estimate)
    }

    pub fn covariance(&self) -> Option<f64> {
        self.state.map(|s| s.covariance)
    }

    pub fn adaptive_r(&self) -> f64 {
        self.adaptive_r
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Back to the uninitialized state with an empty speed window.
    pub fn reset(&mut self) {
        self.state = None;
        self.speeds.clear();
        self.adaptive_r = self.r;
    }
}

impl Default for AdaptiveNoiseEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_R, DEFAULT_Q)
    }
}

/// Three independent scalar filters, one per axis.
#[derive(Clone, Debug)]
pub struct AxisFilters {
    x: AdaptiveNoiseEstimator,
    y: AdaptiveNoiseEstimator,
    z: AdaptiveNoiseEstimator,
}

impl AxisFilters {
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            x: AdaptiveNoiseEstimator::from_config(config),
            y: AdaptiveNoiseEstimator::from_config(config),
            z: AdaptiveNoiseEstimator::from_config(config),
        }
    }

    /// Filter each component with the same speed hint.
    pub fn filter(&mut self, measurement: Vector3, speed: f64) -> Vector3 {
        Vector3::new(
            self.x.filter(measurement.x(), speed),
            self.y.filter(measurement.y(), speed),
            self.z.filter(measurement.z(), speed),
        )
    }

    pub fn adaptive_r(&self) -> (f64, f64, f64) {
        (self.x.adaptive_r(), self.y.adaptive_r(), self.z.adaptive_r())
    }

    pub fn estimate(&self) -> Option<Vector3> {
        Some(Vector3::new(
            self.x.estimate()?,
            self.y.estimate()?,
            self.z.estimate()?,
        ))
    }

    pub fn is_initialized(&self) -> bool {
        self.x.is_initialized() && self.y.is_initialized() && self.z.is_initialized()
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
        self.z.reset();
    }
}
