/// Example: Trajectory Prediction Demo
///
/// Drives a controller with a target that accelerates along X, then prints
/// the extrapolated path from the final motion estimate.
///
/// Outputs trajectory.csv for visualization in Python/Matplotlib.

use std::fs::File;
use std::io::Write;

use target_tracker::prediction::predict_trajectory;
use target_tracker::{CycleOutcome, TrackerConfig, TrackingController, ProfileKind, Vector3};

fn main() -> std::io::Result<()> {
    println!("=== Trajectory Prediction Demo ===\n");

    let hz = 60.0;
    let frame_ms = 1000.0 / hz;
    let config = TrackerConfig { adaptive_skip: false, ..Default::default() };
    let mut controller = TrackingController::with_config(ProfileKind::Default, config);

    // Scenario: 1 unit/s² along X starting from rest, 1 second
    let accel = 1.0;
    let mut output = Vector3::zero();
    for i in 0..60 {
        let t = i as f64 / hz;
        let p = Vector3::new(0.5 * accel * t * t, 0.0, 0.0);
        if let CycleOutcome::Emitted(report) = controller.run_cycle(p, Vector3::zero(), output, i as f64 * frame_ms) {
            output = report.output;
        }
    }

    let motion = controller.motion();
    let last = motion.previous_position().unwrap_or_default();
    println!("After 1s of acceleration:");
    println!("  Position:     {}", last);
    println!("  Velocity:     {}", motion.velocity());
    println!("  Acceleration: {}", motion.acceleration());
    println!("  Output:       {}\n", output);

    let horizon = 0.5;
    let steps = 10;
    let path = predict_trajectory(
        last,
        motion.velocity(),
        motion.acceleration(),
        horizon,
        controller.profile().prediction_scale,
        steps,
    );

    println!("Predicted path (next {:.1}s):", horizon);
    let mut csv = File::create("trajectory.csv")?;
    writeln!(csv, "t,x,y,z")?;
    for (i, point) in path.iter().enumerate() {
        let t = horizon * (i + 1) as f64 / steps as f64;
        println!("  t={:.2}s  {}", t, point);
        writeln!(csv, "{},{},{},{}", t, point.x(), point.y(), point.z())?;
    }
    println!("\nWrote trajectory.csv");

    Ok(())
}
