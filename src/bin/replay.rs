use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use target_tracker::recording::SessionRecording;
use target_tracker::{ProfileSelection, TrackerConfig, TrackingController};

#[derive(Parser, Debug)]
struct Args {
    /// Path to session_*.json[.gz]
    #[arg(long)]
    log: PathBuf,

    /// Override the profile stored in the recording
    #[arg(long)]
    profile: Option<String>,

    /// JSON file overriding pipeline constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let recording = SessionRecording::load(&args.log)
        .with_context(|| format!("Failed to read {}", args.log.display()))?;

    let config = match &args.config {
        Some(path) => TrackerConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => TrackerConfig::default(),
    };

    let profile_name = args.profile.as_deref().unwrap_or(&recording.profile);
    let mut controller =
        TrackingController::with_config(ProfileSelection::select(profile_name), config);

    log::info!(
        "Replaying {} cycles from {} ({} Hz, profile {})",
        recording.records.len(),
        args.log.display(),
        recording.hz,
        controller.profile_kind()
    );

    let summary = recording.replay(&mut controller);

    let snapshot = controller.snapshot();

    if args.json {
        let report = json!({
            "log": args.log.display().to_string(),
            "cycles": summary.cycles,
            "emitted": summary.emitted,
            "recorded_emitted": recording.emitted(),
            "mismatched_skips": summary.mismatched_skips,
            "max_divergence": summary.max_divergence,
            "final": snapshot,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("=== Replay Summary ===");
        println!("Cycles:            {}", summary.cycles);
        println!("Emitted:           {} (recorded {})", summary.emitted, recording.emitted());
        println!("Skip mismatches:   {}", summary.mismatched_skips);
        println!("Max divergence:    {:.6}", summary.max_divergence);
        println!("Final speed:       {:.4}", snapshot.speed);
        println!("Final accuracy:    {:.1}%", snapshot.tracking_accuracy * 100.0);
        if let Some(out) = snapshot.last_output {
            println!("Final output:      {}", out);
        }
    }

    Ok(())
}
