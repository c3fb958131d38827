//! Finite-difference velocity / acceleration from consecutive position samples.

use serde::Serialize;

use crate::config::TrackerConfig;
use crate::types::{RingBuffer, Vector3};

const DEFAULT_HISTORY: usize = 8;
const DEFAULT_MIN_DT: f64 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MotionSample {
    pub position: Vector3,
    pub velocity: Vector3,
    /// Milliseconds
    pub timestamp: f64,
}

#[derive(Clone, Debug)]
pub struct MotionEstimator {
    previous_position: Option<Vector3>,
    velocity: Vector3,
    acceleration: Vector3,
    last_timestamp: Option<f64>,
    history: RingBuffer<MotionSample>,
    /// Floor on the sample interval [seconds]
    min_dt: f64,
}

impl MotionEstimator {
    pub fn new(history_capacity: usize, min_dt: f64) -> Self {
        Self {
            previous_position: None,
            velocity: Vector3::zero(),
            acceleration: Vector3::zero(),
            last_timestamp: None,
            history: RingBuffer::new(history_capacity),
            min_dt,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.history_capacity, config.min_dt)
    }

    /// Ingest a position observed at `timestamp` (milliseconds).
    ///
    /// The interval is floored at `min_dt`, so duplicate or backwards
    /// timestamps yield large but finite derivatives.
    pub fn observe(&mut self, position: Vector3, timestamp: f64) {
        let elapsed_ms = match self.last_timestamp {
            Some(last) => timestamp - last,
            None => 0.0,
        };
        // f64::max discards NaN, so a NaN interval also lands on the floor
        let dt = (elapsed_ms / 1000.0).max(self.min_dt);

        if let Some(prev) = self.previous_position {
            let new_velocity = position.subtract(prev).multiply_scalar(1.0 / dt);
            self.acceleration = new_velocity.subtract(self.velocity).multiply_scalar(1.0 / dt);
            self.velocity = new_velocity;

            self.history.push(MotionSample {
                position,
                velocity: self.velocity,
                timestamp,
            });
        }

        self.previous_position = Some(position);
        self.last_timestamp = Some(timestamp);
    }

    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vector3 {
        self.acceleration
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    pub fn previous_position(&self) -> Option<Vector3> {
        self.previous_position
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Recorded samples, oldest first
    pub fn history(&self) -> impl Iterator<Item = &MotionSample> + '_ {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Zero the derivatives and drop the history. The last observed position
    /// and timestamp survive, so the next sample still yields a velocity.
    pub fn reset(&mut self) {
        self.velocity = Vector3::zero();
        self.acceleration = Vector3::zero();
        self.history.clear();
    }
}

impl Default for MotionEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY, DEFAULT_MIN_DT)
    }
}
