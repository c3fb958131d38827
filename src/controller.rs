// controller.rs — Per-cycle tracking pipeline
//
// One call to `run_cycle` = one tick of an external fixed-rate scheduler:
//   sample -> motion estimate -> extrapolate -> per-axis filter -> shape -> emit
//
// No clocks, no I/O. Timestamps come in as parameters so a recorded session
// replays bit-for-bit.

use serde::Serialize;

use crate::config::TrackerConfig;
use crate::filters::AxisFilters;
use crate::motion::MotionEstimator;
use crate::prediction::predict;
use crate::profile::{Profile, ProfileKind, ProfileSelection};
use crate::shaping::{ResponseShaper, ShapedOutput};
use crate::types::Vector3;

// ─── Cycle results ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub predicted: Vector3,
    pub tracked: Vector3,
    pub shaped: ShapedOutput,
    pub speed: f64,
    pub output: Vector3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CycleOutcome {
    Emitted(CycleReport),
    /// Near-stationary target on an even cycle: nothing observed, nothing emitted
    Skipped { cycle: u64 },
}

impl CycleOutcome {
    pub fn output(&self) -> Option<Vector3> {
        match self {
            CycleOutcome::Emitted(report) => Some(report.output),
            CycleOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CycleOutcome::Skipped { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TrackingPhase {
    Uninitialized,
    Tracking,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    pub profile: ProfileKind,
    pub fell_back_to_default: bool,
    pub phase: TrackingPhase,
    pub cycle_count: u64,
    pub emitted_cycles: u64,
    pub skipped_cycles: u64,
    pub velocity: Vector3,
    pub acceleration: Vector3,
    pub speed: f64,
    pub smoothed_target: Vector3,
    pub filtered_target: Option<Vector3>,
    pub last_output: Option<Vector3>,
    pub last_observed: Option<Vector3>,
    pub last_timestamp_ms: Option<f64>,
    pub adaptive_r: (f64, f64, f64),
    pub history_len: usize,
    pub tracking_accuracy: f64,
}

// ─── Controller ──────────────────────────────────────────────────────────────

pub struct TrackingController {
    config: TrackerConfig,
    selection: ProfileSelection,

    filters: AxisFilters,
    motion: MotionEstimator,
    shaper: ResponseShaper,

    last_output: Option<Vector3>,
    cycle_count: u64,
    emitted_cycles: u64,
    skipped_cycles: u64,
}

impl TrackingController {
    /// Build a controller for a profile name. Unknown names run with the
    /// default profile; see `fell_back_to_default`.
    pub fn new(profile_name: &str) -> Self {
        Self::with_config(ProfileSelection::select(profile_name), TrackerConfig::default())
    }

    pub fn with_config(selection: impl Into<ProfileSelection>, config: TrackerConfig) -> Self {
        let selection = selection.into();
        Self {
            filters: AxisFilters::from_config(&config),
            motion: MotionEstimator::from_config(&config),
            shaper: ResponseShaper::from_config(&config),
            last_output: None,
            cycle_count: 0,
            emitted_cycles: 0,
            skipped_cycles: 0,
            selection,
            config,
        }
    }

    fn should_skip(&mut self) -> bool {
        self.cycle_count += 1;
        self.config.adaptive_skip
            && self.motion.speed() < self.config.stationary_speed
            && self.cycle_count % 2 == 0
    }

    /// Run one pipeline step.
    ///
    /// `current_output` is the baseline the correction is applied to, usually
    /// the previous emission. `timestamp_ms` only needs to be roughly
    /// monotonic; duplicates and reversals are absorbed by the motion estimator.
    pub fn run_cycle(
        &mut self,
        observed: Vector3,
        disturbance: Vector3,
        current_output: Vector3,
        timestamp_ms: f64,
    ) -> CycleOutcome {
        if self.should_skip() {
            self.skipped_cycles += 1;
            log::trace!("cycle {} skipped (speed {:.4})", self.cycle_count, self.motion.speed());
            return CycleOutcome::Skipped { cycle: self.cycle_count };
        }

        self.motion.observe(observed, timestamp_ms);
        let velocity = self.motion.velocity();
        let speed = velocity.magnitude();

        let predicted = predict(
            observed,
            velocity,
            self.motion.acceleration(),
            self.config.prediction_horizon,
            self.selection.profile.prediction_scale,
        );
        let tracked = self.filters.filter(predicted, speed);

        let profile = self.selection.profile;
        let shaped = self
            .shaper
            .apply(tracked, disturbance, current_output, velocity, &profile);

        self.last_output = Some(shaped.smoothed);
        self.emitted_cycles += 1;

        log::debug!(
            "cycle {} | out {} | speed {:.3} | dist {:.4} | gain {:.2}",
            self.cycle_count,
            shaped.smoothed,
            speed,
            shaped.distance,
            shaped.gain
        );

        CycleOutcome::Emitted(CycleReport {
            cycle: self.cycle_count,
            predicted,
            tracked,
            shaped,
            speed,
            output: shaped.smoothed,
        })
    }

    /// Reinitialize the three filters, clear motion history and zero the
    /// derivatives. The last observed position, profile, cycle counter and
    /// smoothing state are kept.
    pub fn reset(&mut self) {
        self.filters.reset();
        self.motion.reset();
        log::info!("Tracking reset ({} cycles so far)", self.cycle_count);
    }

    /// `max(0, 1 - 10 * |last_output - last_observed|)`, 0 before any observation.
    pub fn tracking_accuracy(&self) -> f64 {
        match (self.last_output, self.motion.previous_position()) {
            (Some(output), Some(observed)) => (1.0 - output.distance(observed) * 10.0).max(0.0),
            _ => 0.0,
        }
    }

    pub fn phase(&self) -> TrackingPhase {
        if self.filters.is_initialized() {
            TrackingPhase::Tracking
        } else {
            TrackingPhase::Uninitialized
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.selection.profile
    }

    pub fn profile_kind(&self) -> ProfileKind {
        self.selection.kind
    }

    pub fn fell_back_to_default(&self) -> bool {
        self.selection.fell_back
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn last_output(&self) -> Option<Vector3> {
        self.last_output
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn motion(&self) -> &MotionEstimator {
        &self.motion
    }

    pub fn filters(&self) -> &AxisFilters {
        &self.filters
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            profile: self.selection.kind,
            fell_back_to_default: self.selection.fell_back,
            phase: self.phase(),
            cycle_count: self.cycle_count,
            emitted_cycles: self.emitted_cycles,
            skipped_cycles: self.skipped_cycles,
            velocity: self.motion.velocity(),
            acceleration: self.motion.acceleration(),
            speed: self.motion.speed(),
            smoothed_target: self.shaper.smoothed(),
            filtered_target: self.filters.estimate(),
            last_output: self.last_output,
            last_observed: self.motion.previous_position(),
            last_timestamp_ms: self.motion.last_timestamp(),
            adaptive_r: self.filters.adaptive_r(),
            history_len: self.motion.history_len(),
            tracking_accuracy: self.tracking_accuracy(),
        }
    }
}

impl Default for TrackingController {
    fn default() -> Self {
        Self::with_config(ProfileKind::Default, TrackerConfig::default())
    }
}
