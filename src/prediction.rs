/// Constant-acceleration extrapolation
///
///   p(h) = p0 + v * (h * scale) + 0.5 * a * h²
///
/// `scale` only stretches the velocity term; the acceleration term uses the
/// raw horizon.

use crate::types::Vector3;

pub fn predict(
    position: Vector3,
    velocity: Vector3,
    acceleration: Vector3,
    horizon: f64,
    prediction_scale: f64,
) -> Vector3 {
    let vel_term = velocity.multiply_scalar(horizon * prediction_scale);
    let accel_term = acceleration.multiply_scalar(0.5 * horizon * horizon);
    position.add(vel_term).add(accel_term)
}

/// Sample the extrapolated path at `steps` evenly spaced points in (0, horizon].
pub fn predict_trajectory(
    position: Vector3,
    velocity: Vector3,
    acceleration: Vector3,
    horizon: f64,
    prediction_scale: f64,
    steps: usize,
) -> Vec<Vector3> {
    if steps == 0 {
        return Vec::new();
    }
    let step = horizon / steps as f64;
    (1..=steps)
        .map(|i| predict(position, velocity, acceleration, step * i as f64, prediction_scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_motion_is_identity() {
        let p = Vector3::new(-0.0456970781, -0.004478302, -0.0200432576);
        for (h, s) in [(0.0, 1.0), (0.05, 1.6), (10.0, 0.0), (1e3, 42.0)] {
            assert_eq!(predict(p, Vector3::zero(), Vector3::zero(), h, s), p);
        }
    }

    #[test]
    fn test_velocity_term_scaled() {
        let p = predict(
            Vector3::zero(),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::zero(),
            0.05,
            1.6,
        );
        assert_abs_diff_eq!(p.x(), 2.0 * 0.05 * 1.6, epsilon = 1e-12);
    }

    #[test]
    fn test_acceleration_term_ignores_scale() {
        let a = Vector3::new(0.0, 10.0, 0.0);
        let p1 = predict(Vector3::zero(), Vector3::zero(), a, 0.1, 1.0);
        let p2 = predict(Vector3::zero(), Vector3::zero(), a, 0.1, 5.0);
        assert_abs_diff_eq!(p1.y(), 0.05, epsilon = 1e-12);
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_trajectory_ends_at_horizon() {
        let pos = Vector3::new(1.0, 1.0, 1.0);
        let vel = Vector3::new(1.0, 0.0, 0.0);
        let acc = Vector3::new(0.0, 0.0, -2.0);
        let path = predict_trajectory(pos, vel, acc, 0.5, 1.0, 5);

        assert_eq!(path.len(), 5);
        let last = path[4];
        let direct = predict(pos, vel, acc, 0.5, 1.0);
        assert_abs_diff_eq!(last.x(), direct.x(), epsilon = 1e-12);
        assert_abs_diff_eq!(last.z(), direct.z(), epsilon = 1e-12);
        assert!(predict_trajectory(pos, vel, acc, 0.5, 1.0, 0).is_empty());
    }
}
