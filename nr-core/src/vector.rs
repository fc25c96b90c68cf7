//! Three-dimensional vectors over `f64`.

use std::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
};

use crate::{tolerance::approx_eq, ArithmeticError};

/// An immutable 3D vector (or point).
///
/// As with [`crate::Complex`], equality is approximate and there is no `Hash` implementation.
#[derive(Copy, Clone, Debug, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    pub fn norm(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    /// Unit vector in the same direction.
    pub fn normalized(&self) -> Result<Vector3, ArithmeticError> {
        let norm = self.norm();
        if approx_eq(norm, 0.0) {
            return Err(ArithmeticError::ZeroNorm);
        }
        Ok(self.scale(1.0 / norm))
    }

    pub fn dot(&self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - other.y * self.z,
            other.x * self.z - self.x * other.z,
            self.x * other.y - other.x * self.y,
        )
    }

    pub fn scale(&self, s: f64) -> Vector3 {
        Vector3::new(self.x * s, self.y * s, self.z * s)
    }

    /// Cosine of the angle between this vector and `other`.
    pub fn cos_angle(&self, other: Vector3) -> Result<f64, ArithmeticError> {
        let denominator = self.norm() * other.norm();
        if approx_eq(denominator, 0.0) {
            return Err(ArithmeticError::ZeroDenominator);
        }
        Ok(self.dot(other) / denominator)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y) && approx_eq(self.z, other.z)
    }
}

impl Add<Vector3> for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Self {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub<Vector3> for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Self {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Self {
        self.scale(-1.0)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.6})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm() {
        assert!(approx_eq(Vector3::new(3.0, 4.0, 0.0).norm(), 5.0));
        assert!(approx_eq(Vector3::new(1.0, 2.0, 2.0).norm(), 3.0));
    }

    #[test]
    fn test_normalized() {
        let v = Vector3::new(0.0, 0.0, -4.0).normalized().unwrap();
        assert_eq!(v, Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(
            Vector3::default().normalized(),
            Err(ArithmeticError::ZeroNorm)
        );
    }

    #[test]
    fn test_dot_and_cross() {
        let i = Vector3::new(1.0, 0.0, 0.0);
        let j = Vector3::new(0.0, 1.0, 0.0);
        let k = Vector3::new(0.0, 0.0, 1.0);
        assert!(approx_eq(i.dot(j), 0.0));
        assert_eq!(i.cross(j), k);
        assert_eq!(j.cross(k), i);
        assert_eq!(j.cross(i), -k);

        let a = Vector3::new(3.0, -3.0, 1.0);
        let b = Vector3::new(4.0, 9.0, 2.0);
        assert_eq!(a.cross(b), Vector3::new(-15.0, -2.0, 39.0));
        assert!(approx_eq(a.dot(b), -13.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-1.0, 0.5, 2.0);
        assert_eq!(a + b, Vector3::new(0.0, 2.5, 5.0));
        assert_eq!(a - b, Vector3::new(2.0, 1.5, 1.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(a.to_array(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_cos_angle() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 1.0, 0.0);
        assert!(approx_eq(a.cos_angle(b).unwrap(), std::f64::consts::FRAC_1_SQRT_2));
        assert_eq!(
            a.cos_angle(Vector3::default()),
            Err(ArithmeticError::ZeroDenominator)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Vector3::new(1.0, -0.5, 2.0).to_string(),
            "(1.000000, -0.500000, 2.000000)"
        );
    }
}
