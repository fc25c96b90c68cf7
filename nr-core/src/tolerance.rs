//! Approximate comparison of `f64` values.

use std::cmp::Ordering;

/// Two values closer than this are considered equal.
pub const EPSILON: f64 = 1e-5;

/// Returns true if `a` and `b` differ by less than [`EPSILON`].
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Orders two values, treating values within [`EPSILON`] of each other as equal.
#[inline]
pub fn approx_cmp(a: f64, b: f64) -> Ordering {
    if a - b > EPSILON {
        Ordering::Greater
    } else if approx_eq(a, b) {
        Ordering::Equal
    } else {
        Ordering::Less
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0 + EPSILON / 2.0));
        assert!(!approx_eq(1.0, 1.0 + EPSILON * 2.0));
    }

    #[test]
    fn test_approx_cmp() {
        assert_eq!(approx_cmp(1.0, 1.000001), Ordering::Equal);
        assert_eq!(approx_cmp(1.0, 2.0), Ordering::Less);
        assert_eq!(approx_cmp(2.0, 1.0), Ordering::Greater);
        // Just outside the window on the low side.
        assert_eq!(approx_cmp(1.0, 1.0 + 2.0 * EPSILON), Ordering::Less);
    }
}
