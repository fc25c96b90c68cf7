//! Complex numbers over `f64`.
//!
//! Values are immutable; every operation returns a new number.
//! Equality is approximate (see [`crate::tolerance`]), so `Complex` has no `Hash` or `Eq`
//! implementation: two "equal" values may have different bit patterns.

use std::{
    f64::consts::PI,
    fmt,
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use crate::{error::ArithmeticError, tolerance::approx_eq, ParseError};

mod lexer;
mod parser;

pub use lexer::{Lexer, Token};
pub use parser::Parser;

#[derive(Copy, Clone, Debug, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex::new(0.0, 0.0);
    pub const ONE: Complex = Complex::new(1.0, 0.0);
    pub const ONE_NEG: Complex = Complex::new(-1.0, 0.0);
    pub const IM: Complex = Complex::new(0.0, 1.0);
    pub const IM_NEG: Complex = Complex::new(0.0, -1.0);

    pub const fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    /// Parses a literal such as `"-2.71 - i3.15"`.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Parser::new(input)?.parse()
    }

    /// Absolute value (modulus).
    pub fn module(&self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Euclidean distance to `other` in the complex plane.
    pub fn distance(&self, other: Complex) -> f64 {
        (*self - other).module()
    }

    pub fn divide(self, rhs: Complex) -> Result<Complex, ArithmeticError> {
        if rhs == Complex::ZERO {
            return Err(ArithmeticError::DivisionByZero);
        }
        // (a + ib) / (c + id) = ((ac + bd) + i(bc - ad)) / (c^2 + d^2)
        let denominator = rhs.re * rhs.re + rhs.im * rhs.im;
        Ok(Complex {
            re: (self.re * rhs.re + self.im * rhs.im) / denominator,
            im: (self.im * rhs.re - self.re * rhs.im) / denominator,
        })
    }

    /// Raises this number to the `n`th power via the polar form.
    pub fn power(&self, n: u32) -> Complex {
        let magnitude = self.module().powf(f64::from(n));
        let angle = f64::from(n) * self.angle();
        Complex::new(magnitude * angle.cos(), magnitude * angle.sin())
    }

    /// All `n` distinct `n`th roots, by de Moivre's formula.
    ///
    /// Root `k` has angle `(arg + 2kπ) / n`; roots are returned in order of `k`.
    pub fn root(&self, n: u32) -> Result<Vec<Complex>, ArithmeticError> {
        if n == 0 {
            return Err(ArithmeticError::ZeroRootOrder);
        }
        let order = f64::from(n);
        let magnitude = self.module().powf(1.0 / order);
        let angle = self.angle();
        Ok((0..n)
            .map(|k| {
                let arg = (angle + 2.0 * f64::from(k) * PI) / order;
                Complex::new(magnitude * arg.cos(), magnitude * arg.sin())
            })
            .collect())
    }

    /// Argument normalized to `[0, 2π)`.
    fn angle(&self) -> f64 {
        let angle = self.im.atan2(self.re);
        if angle < 0.0 {
            angle + 2.0 * PI
        } else {
            angle
        }
    }
}

impl PartialEq for Complex {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.re, other.re) && approx_eq(self.im, other.im)
    }
}

impl Neg for Complex {
    type Output = Complex;

    fn neg(self) -> Self {
        Complex::new(-self.re, -self.im)
    }
}

impl Add<Complex> for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Self {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub<Complex> for Complex {
    type Output = Complex;

    fn sub(self, rhs: Complex) -> Self {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul<Complex> for Complex {
    type Output = Complex;

    fn mul(self, rhs: Complex) -> Self {
        // (a + ib) * (c + id)
        // = ac + aid + (ibc + i^2 bd)      (FOIL)
        // = (ac - bd) + i(ad + bc)         (turning i^2 into -1, combining real/imaginary terms)
        let (a, b) = (self.re, self.im);
        let (c, d) = (rhs.re, rhs.im);
        Complex::new(a * c - b * d, a * d + b * c)
    }
}

impl FromStr for Complex {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Complex::parse(s)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.im < 0.0 { '-' } else { '+' };
        write!(f, "({:.6} {} {:.6}i)", self.re, sign, self.im.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, delta: f64) {
        assert!(
            (actual - expected).abs() < delta,
            "{} is not within {} of {}",
            actual,
            delta,
            expected
        );
    }

    #[test]
    fn test_module() {
        assert_close(Complex::new(-5.0, 6.0).module(), 7.8102496, 0.001);
        assert_close(Complex::ZERO.module(), 0.0, 0.001);
        assert_close(Complex::new(2.0, 2.0).module(), 2.828427124, 0.001);
        assert_close(Complex::new(-1.0, -10.0).module(), 10.0498756, 0.001);
    }

    #[test]
    fn test_multiply() {
        let res = Complex::new(10.0, 24.0) * Complex::new(-3.0, 7.0);
        assert_close(res.re, -198.0, 0.0001);
        assert_close(res.im, -2.0, 0.0001);
    }

    #[test]
    fn test_divide() {
        let res = Complex::new(10.0, -31.0)
            .divide(Complex::new(-3.0, 7.0))
            .unwrap();
        assert_close(res.re, -4.258620, 0.0001);
        assert_close(res.im, 0.3965517, 0.0001);
    }

    #[test]
    fn test_divide_by_zero() {
        let err = Complex::new(10.0, -31.0).divide(Complex::ZERO).unwrap_err();
        assert_eq!(err, ArithmeticError::DivisionByZero);
        // Within tolerance of zero counts as zero.
        assert!(Complex::ONE.divide(Complex::new(1e-7, -1e-7)).is_err());
    }

    #[test]
    fn test_add_sub() {
        let c1 = Complex::new(3.0, 7.0);
        let c2 = Complex::new(-5.0, 8.0);
        let c3 = Complex::IM_NEG;
        assert_eq!(c1 + c2, Complex::new(-2.0, 15.0));
        assert_eq!(c3 + c2, Complex::new(-5.0, 7.0));
        assert_eq!(c1 - c2, Complex::new(8.0, -1.0));
        assert_eq!(c3 - c2, Complex::new(5.0, -9.0));
    }

    #[test]
    fn test_inverse_operations() {
        let values = [
            Complex::new(3.0, 7.0),
            Complex::new(-0.5, 0.25),
            Complex::new(1e3, -42.0),
            Complex::IM,
        ];
        for a in values {
            for b in values {
                assert_eq!((a + b) - b, a);
                assert_eq!((a * b).divide(b).unwrap(), a, "{} * {} / {}", a, b, b);
            }
        }
    }

    #[test]
    fn test_negate() {
        assert_eq!(-Complex::new(5.0, -7.0), Complex::new(-5.0, 7.0));
    }

    #[test]
    fn test_power() {
        let c = Complex::new(1.57, -2.0);
        assert_eq!(c.power(5), Complex::new(-19.656821, 104.4346799));
        assert_eq!(c.power(0), Complex::ONE);
        assert_eq!(c.power(1), c);
    }

    #[test]
    fn test_root() {
        let roots = Complex::new(1.57, -2.0).root(3).unwrap();
        assert_eq!(
            roots,
            vec![
                Complex::new(-0.300310, 1.331429),
                Complex::new(-1.002896, -0.925791),
                Complex::new(1.303207, -0.405638),
            ]
        );
    }

    #[test]
    fn test_root_powers_back() {
        for z in [Complex::new(1.57, -2.0), Complex::new(-3.0, 0.5), Complex::IM] {
            for n in 1..6 {
                let roots = z.root(n).unwrap();
                assert_eq!(roots.len(), n as usize);
                for root in roots {
                    assert_eq!(root.power(n), z, "{}^{} != {}", root, n, z);
                }
            }
        }
    }

    #[test]
    fn test_root_zero_order() {
        assert_eq!(
            Complex::ONE.root(0).unwrap_err(),
            ArithmeticError::ZeroRootOrder
        );
    }

    #[test]
    fn test_distance() {
        assert_close(Complex::ZERO.distance(Complex::new(1.0, 7.0)), 7.0710678, 0.0001);
    }

    #[test]
    fn test_display() {
        assert_eq!(Complex::new(1.0, -2.5).to_string(), "(1.000000 - 2.500000i)");
        assert_eq!(Complex::IM.to_string(), "(0.000000 + 1.000000i)");
    }

    #[test]
    fn test_from_str() {
        let z: Complex = "-2.71-i3.15".parse().unwrap();
        assert_eq!(z, Complex::new(-2.71, -3.15));
    }
}
