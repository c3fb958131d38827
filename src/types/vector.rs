//! 3D value type used throughout the tracking pipeline
//!
//! Thin wrapper over `nalgebra::Vector3<f64>`. Every operation returns a new
//! value; nothing is mutated in place by arithmetic.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use nalgebra as na;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector3(na::Vector3<f64>);

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3(na::Vector3::new(x, y, z))
    }

    pub fn zero() -> Self {
        Vector3(na::Vector3::zeros())
    }

    #[inline]
    pub fn x(self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn z(self) -> f64 {
        self.0.z
    }

    pub fn add(self, other: Vector3) -> Vector3 {
        Vector3(self.0 + other.0)
    }

    pub fn subtract(self, other: Vector3) -> Vector3 {
        Vector3(self.0 - other.0)
    }

    pub fn multiply_scalar(self, s: f64) -> Vector3 {
        Vector3(self.0 * s)
    }

    /// Euclidean length: sqrt(x² + y² + z²)
    pub fn magnitude(self) -> f64 {
        self.0.norm()
    }

    /// Unit vector in the same direction, or the zero vector when the
    /// magnitude is not positive.
    pub fn normalize(self) -> Vector3 {
        let mag = self.magnitude();
        if mag > 0.0 {
            self.multiply_scalar(1.0 / mag)
        } else {
            Vector3::zero()
        }
    }

    pub fn distance(self, other: Vector3) -> f64 {
        self.subtract(other).magnitude()
    }

    /// `self + (other - self) * t`. `t` is not clamped, values outside
    /// [0, 1] extrapolate.
    pub fn lerp(self, other: Vector3, t: f64) -> Vector3 {
        Vector3(self.0 + (other.0 - self.0) * t)
    }

    pub fn is_finite(self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Vector3::zero()
    }
}

impl From<na::Vector3<f64>> for Vector3 {
    fn from(v: na::Vector3<f64>) -> Self {
        Vector3(v)
    }
}

impl From<Vector3> for na::Vector3<f64> {
    fn from(v: Vector3) -> Self {
        v.0
    }
}

impl From<(f64, f64, f64)> for Vector3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Vector3::new(x, y, z)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0 + rhs.0)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0 - rhs.0)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Vector3 {
        Vector3(self.0 * rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3(-self.0)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x(), self.y(), self.z())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_arithmetic_returns_new_values() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(0.5, -1.0, 2.0);

        let sum = a.add(b);
        let diff = a.subtract(b);
        let scaled = a.multiply_scalar(2.0);

        assert_eq!(sum, Vector3::new(1.5, 1.0, 5.0));
        assert_eq!(diff, Vector3::new(0.5, 3.0, 1.0));
        assert_eq!(scaled, Vector3::new(2.0, 4.0, 6.0));
        // Operands untouched
        assert_eq!(a, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(a + b, sum);
        assert_eq!(a - b, diff);
        assert_eq!(a * 2.0, scaled);
    }

    #[test]
    fn test_magnitude_and_distance() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        assert_abs_diff_eq!(v.magnitude(), 5.0, epsilon = 1e-12);

        let origin = Vector3::zero();
        assert_abs_diff_eq!(v.distance(origin), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(origin.distance(v), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let n = Vector3::zero().normalize();
        assert_eq!(n, Vector3::zero());
        assert!(n.is_finite());
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = Vector3::new(0.0, -2.0, 0.0).normalize();
        assert_abs_diff_eq!(n.magnitude(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(n.y(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lerp_endpoints_and_extrapolation() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(2.0, -4.0, 1.0);

        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Vector3::new(1.0, -2.0, 0.5));
        // Not clamped
        assert_eq!(a.lerp(b, 2.0), Vector3::new(4.0, -8.0, 2.0));
    }

    #[test]
    fn test_serializes_as_array() {
        let v = Vector3::new(1.0, 2.5, -3.0);
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.starts_with('['));
        let back: Vector3 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
