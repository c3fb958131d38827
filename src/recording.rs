use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::controller::{CycleOutcome, TrackingController};
use crate::error::TrackerResult;
use crate::types::Vector3;

/// Inputs and output of one scheduler tick
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub timestamp_ms: f64,
    pub observed: Vector3,
    pub disturbance: Vector3,
    pub baseline: Vector3,
    /// None for skipped cycles
    pub output: Option<Vector3>,
}

/// Outcome of re-running a recording through a controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub cycles: usize,
    pub emitted: usize,
    /// Cycles emitted in one run and skipped in the other
    pub mismatched_skips: usize,
    /// Largest |replayed - recorded| over cycles both runs emitted
    pub max_divergence: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecording {
    pub profile: String,
    /// RFC3339
    pub started_at: String,
    pub hz: f64,
    pub records: Vec<CycleRecord>,
    /// Free-form final controller state, as written by the harness
    #[serde(default)]
    pub final_snapshot: Option<serde_json::Value>,
}

impl SessionRecording {
    pub fn new(profile: &str, hz: f64) -> Self {
        SessionRecording {
            profile: profile.to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
            hz,
            records: Vec::new(),
            final_snapshot: None,
        }
    }

    pub fn emitted(&self) -> usize {
        self.records.iter().filter(|r| r.output.is_some()).count()
    }

    /// Run one controller cycle and append its inputs and output.
    ///
    /// `baseline` is stored exactly as passed to the controller, so any
    /// feedback update belongs after this call.
    pub fn record_cycle(
        &mut self,
        controller: &mut TrackingController,
        observed: Vector3,
        disturbance: Vector3,
        baseline: Vector3,
        timestamp_ms: f64,
    ) -> CycleOutcome {
        let outcome = controller.run_cycle(observed, disturbance, baseline, timestamp_ms);
        self.records.push(CycleRecord {
            timestamp_ms,
            observed,
            disturbance,
            baseline,
            output: outcome.output(),
        });
        outcome
    }

    /// Feed every record through `controller` and compare against the
    /// recorded outputs.
    pub fn replay(&self, controller: &mut TrackingController) -> ReplaySummary {
        let mut summary = ReplaySummary { cycles: self.records.len(), ..Default::default() };

        for record in &self.records {
            let replayed = controller
                .run_cycle(record.observed, record.disturbance, record.baseline, record.timestamp_ms)
                .output();

            match (replayed, record.output) {
                (Some(replayed), Some(original)) => {
                    summary.max_divergence = summary.max_divergence.max(replayed.distance(original));
                }
                (None, None) => {}
                _ => summary.mismatched_skips += 1,
            }
            if replayed.is_some() {
                summary.emitted += 1;
            }
        }
        summary
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> TrackerResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Load `.json` or gzip-compressed `.json.gz`.
    pub fn load<P: AsRef<Path>>(path: P) -> TrackerResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let is_gz = path.extension().map(|e| e == "gz").unwrap_or(false);
        let reader: Box<dyn Read> = if is_gz {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        let recording = serde_json::from_reader(BufReader::new(reader))?;
        Ok(recording)
    }
}
