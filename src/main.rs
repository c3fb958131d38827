use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};

use target_tracker::recording::SessionRecording;
use target_tracker::{CycleOutcome, ProfileSelection, TrackerConfig, TrackingController, Vector3};

#[derive(Parser, Debug)]
#[command(name = "tracker")]
#[command(about = "Fixed-rate harness driving the tracking pipeline against a simulated target", long_about = None)]
struct Args {
    /// Profile name (unknown names fall back to DEFAULT)
    #[arg(long, default_value = "M1887")]
    profile: String,

    /// Cycle rate in Hz
    #[arg(long, default_value_t = 120.0)]
    hz: f64,

    /// Number of cycles to run (0 = until Ctrl-C)
    #[arg(long, default_value_t = 0)]
    cycles: u64,

    /// JSON file overriding pipeline constants
    #[arg(long)]
    config: Option<String>,

    /// Feed each emitted vector back as the next cycle's baseline
    #[arg(long)]
    feedback: bool,

    /// Disable stationary cycle skipping
    #[arg(long)]
    no_skip: bool,

    /// Output directory for the session recording
    #[arg(long, default_value = "tracker_sessions")]
    output_dir: String,
}

/// Rest position the simulated target oscillates around
const TARGET_ANCHOR: (f64, f64, f64) = (-0.0456970781, -0.004478302, -0.0200432576);

fn simulated_target(t: f64) -> Vector3 {
    let anchor = Vector3::from(TARGET_ANCHOR);
    anchor.add(Vector3::new(
        (t * 2.0).sin() * 0.01,
        (t * 1.5).cos() * 0.008,
        (t * 0.8).sin() * 0.005,
    ))
}

/// Deterministic stand-in for a disturbance source: small, fast, zero-mean jitter
fn simulated_disturbance(t: f64) -> Vector3 {
    Vector3::new((t * 37.0).sin() * 0.001, (t * 53.0).cos() * 0.0015, 0.0)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !(args.hz.is_finite() && args.hz > 0.0) {
        anyhow::bail!("--hz must be a positive number (got {})", args.hz);
    }

    let mut config = match &args.config {
        Some(path) => TrackerConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => TrackerConfig::default(),
    };
    if args.no_skip {
        config.adaptive_skip = false;
    }

    let selection = ProfileSelection::select(&args.profile);
    let profile_name = selection.kind.to_string();
    let mut controller = TrackingController::with_config(selection, config);

    log::info!("Tracker starting");
    log::info!("  Profile: {} (requested '{}')", profile_name, args.profile);
    log::info!("  Rate: {:.1} Hz", args.hz);
    log::info!("  Cycles: {} (0=continuous)", args.cycles);
    log::info!("  Baseline: {}", if args.feedback { "feedback" } else { "fixed origin" });
    if controller.fell_back_to_default() {
        log::warn!("Profile '{}' not found, running with DEFAULT", args.profile);
    }

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir))?;

    let mut recording = SessionRecording::new(&profile_name, args.hz);
    let mut ticker = interval(Duration::from_secs_f64(1.0 / args.hz));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let start = Instant::now();
    let mut window_start = Instant::now();
    let mut baseline = Vector3::zero();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut ctrl_c => {
                log::info!("Interrupted, stopping...");
                break;
            }
        }

        let t = start.elapsed().as_secs_f64();
        let now_ms = Utc::now().timestamp_millis() as f64;
        let observed = simulated_target(t);
        let disturbance = simulated_disturbance(t);

        let outcome = recording.record_cycle(&mut controller, observed, disturbance, baseline, now_ms);
        if let CycleOutcome::Emitted(report) = &outcome {
            log::debug!(
                "Lock | Pos: {} | Vel: {:.3} | Dist: {:.4}",
                report.output,
                report.speed,
                report.output.distance(observed)
            );
            if args.feedback {
                baseline = report.output;
            }
        }

        let cycle = controller.cycle_count();
        if cycle % 60 == 0 {
            let elapsed = window_start.elapsed().as_secs_f64().max(1e-6);
            log::info!(
                "Performance: {:.1} cycles/s | Accuracy: {:.1}%",
                60.0 / elapsed,
                controller.tracking_accuracy() * 100.0
            );
            window_start = Instant::now();
        }

        if args.cycles > 0 && cycle >= args.cycles {
            log::info!("Cycle budget reached, stopping...");
            break;
        }
    }

    let snapshot = controller.snapshot();
    recording.final_snapshot = Some(serde_json::to_value(&snapshot)?);

    let filename = format!(
        "{}/session_{}.json",
        args.output_dir,
        Utc::now().format("%Y%m%d_%H%M%S")
    );
    recording
        .save(&filename)
        .with_context(|| format!("Failed to write {}", filename))?;

    log::info!("=== Final Stats ===");
    log::info!("Cycles: {} ({} emitted, {} skipped)", snapshot.cycle_count, snapshot.emitted_cycles, snapshot.skipped_cycles);
    log::info!("Speed: {:.3} | Accuracy: {:.1}%", snapshot.speed, snapshot.tracking_accuracy * 100.0);
    log::info!("Saved {} records to {}", recording.records.len(), filename);

    Ok(())
}
