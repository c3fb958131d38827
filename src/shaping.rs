//! Output shaping: disturbance compensation, distance-adaptive gain,
//! exponential smoothing.

use serde::Serialize;

use crate::config::TrackerConfig;
use crate::profile::Profile;
use crate::types::Vector3;

/// Intermediate values of one shaping pass, kept for telemetry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ShapedOutput {
    pub compensated: Vector3,
    pub distance: f64,
    pub gain: f64,
    pub adjusted: Vector3,
    pub smoothed: Vector3,
}

#[derive(Clone, Debug)]
pub struct ResponseShaper {
    /// Running exponential-smoothing state
    smoothed: Vector3,
    velocity_compensation_constant: f64,
    snap_gain: f64,
    velocity_gain_slope: f64,
    velocity_gain_cap: f64,
}

impl ResponseShaper {
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            smoothed: Vector3::zero(),
            velocity_compensation_constant: config.velocity_compensation_constant,
            snap_gain: config.snap_gain,
            velocity_gain_slope: config.velocity_gain_slope,
            velocity_gain_cap: config.velocity_gain_cap,
        }
    }

    /// `filtered - disturbance * recoil + velocity * velocity_comp * c`
    pub fn compensate(
        &self,
        filtered: Vector3,
        disturbance: Vector3,
        velocity: Vector3,
        profile: &Profile,
    ) -> Vector3 {
        let disturbance_term = disturbance.multiply_scalar(profile.recoil_compensation);
        let velocity_term = velocity
            .multiply_scalar(profile.velocity_compensation * self.velocity_compensation_constant);
        filtered.subtract(disturbance_term).add(velocity_term)
    }

    /// Gain for a given distance to the target and target speed.
    ///
    /// Inside the snap threshold the gain is `sensitivity * snap_gain`.
    /// Outside it scales with speed from 1x up to the cap.
    pub fn correction_gain(&self, distance: f64, speed: f64, profile: &Profile) -> f64 {
        if distance < profile.snap_threshold {
            return profile.sensitivity * self.snap_gain;
        }
        // NaN speed collapses to the 1x floor
        let speed = if speed.is_nan() { 0.0 } else { speed };
        let velocity_factor = (speed * self.velocity_gain_slope + 1.0)
            .min(self.velocity_gain_cap)
            .max(1.0);
        profile.sensitivity * velocity_factor
    }

    /// Move `current` toward `target` by the correction gain.
    pub fn apply_gain(
        &self,
        current: Vector3,
        target: Vector3,
        speed: f64,
        profile: &Profile,
    ) -> (Vector3, f64, f64) {
        let distance = current.distance(target);
        let gain = self.correction_gain(distance, speed, profile);
        let delta = target.subtract(current);
        (current.add(delta.multiply_scalar(gain)), distance, gain)
    }

    /// `smoothed = lerp(smoothed, target, smoothing_factor)`
    pub fn smooth(&mut self, target: Vector3, profile: &Profile) -> Vector3 {
        self.smoothed = self.smoothed.lerp(target, profile.smoothing_factor);
        self.smoothed
    }

    /// Full chain: compensate, gain toward `current_output`, smooth.
    pub fn apply(
        &mut self,
        tracked: Vector3,
        disturbance: Vector3,
        current_output: Vector3,
        velocity: Vector3,
        profile: &Profile,
    ) -> ShapedOutput {
        let compensated = self.compensate(tracked, disturbance, velocity, profile);
        let (adjusted, distance, gain) =
            self.apply_gain(current_output, compensated, velocity.magnitude(), profile);
        let smoothed = self.smooth(adjusted, profile);

        ShapedOutput {
            compensated,
            distance,
            gain,
            adjusted,
            smoothed,
        }
    }

    pub fn smoothed(&self) -> Vector3 {
        self.smoothed
    }
}
