//! Complex polynomials, in coefficient form and in root (product) form.

use std::fmt;

use crate::{Complex, PolynomialError};

/// A polynomial `c0 + c1*z + ... + cn*z^n`, stored as `[c0, c1, ..., cn]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexPolynomial {
    coefficients: Vec<Complex>,
}

impl ComplexPolynomial {
    pub fn new(coefficients: Vec<Complex>) -> Result<Self, PolynomialError> {
        if coefficients.is_empty() {
            return Err(PolynomialError::NoCoefficients);
        }
        Ok(ComplexPolynomial { coefficients })
    }

    /// Coefficients in ascending order of power.
    pub fn coefficients(&self) -> &[Complex] {
        &self.coefficients
    }

    /// Highest power present, i.e. `len - 1`.
    pub fn order(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Product of two polynomials (discrete convolution of the coefficients).
    pub fn multiply(&self, other: &ComplexPolynomial) -> ComplexPolynomial {
        let mut product = vec![Complex::ZERO; self.coefficients.len() + other.order()];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                product[i + j] = product[i + j] + *a * *b;
            }
        }
        ComplexPolynomial {
            coefficients: product,
        }
    }

    /// First derivative.
    ///
    /// The derivative of a constant is the zero polynomial `[0]`, so the result always has
    /// at least one coefficient.
    pub fn derive(&self) -> ComplexPolynomial {
        let coefficients: Vec<Complex> = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(power, c)| *c * Complex::new(power as f64, 0.0))
            .collect();
        if coefficients.is_empty() {
            return ComplexPolynomial {
                coefficients: vec![Complex::ZERO],
            };
        }
        ComplexPolynomial { coefficients }
    }

    /// Evaluates the polynomial at `z`.
    pub fn apply(&self, z: Complex) -> Complex {
        // Horner's scheme.
        self.coefficients
            .iter()
            .rev()
            .fold(Complex::ZERO, |acc, c| acc * z + *c)
    }
}

impl fmt::Display for ComplexPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f(z) = ")?;
        for (power, c) in self.coefficients.iter().enumerate().rev() {
            if power != self.order() {
                write!(f, " + ")?;
            }
            write!(f, "{} * z^{}", c, power)?;
        }
        Ok(())
    }
}

/// A polynomial `(z - r0) * (z - r1) * ... * (z - rn)`, stored as its roots.
#[derive(Clone, Debug, PartialEq)]
pub struct RootedPolynomial {
    roots: Vec<Complex>,
}

impl RootedPolynomial {
    pub fn new(roots: Vec<Complex>) -> Result<Self, PolynomialError> {
        if roots.is_empty() {
            return Err(PolynomialError::NoRoots);
        }
        Ok(RootedPolynomial { roots })
    }

    pub fn roots(&self) -> &[Complex] {
        &self.roots
    }

    pub fn apply(&self, z: Complex) -> Complex {
        self.roots
            .iter()
            .fold(Complex::ONE, |acc, root| acc * (z - *root))
    }

    /// Index of the root nearest to `z`, if that root is within `threshold`.
    ///
    /// Scans left to right; on an exact tie in distance the earlier root wins.
    pub fn index_of_closest_root(&self, z: Complex, threshold: f64) -> Option<usize> {
        let mut min_index = 0;
        let mut min_distance = self.roots[0].distance(z);
        for (index, root) in self.roots.iter().enumerate().skip(1) {
            let distance = root.distance(z);
            if distance < min_distance {
                min_distance = distance;
                min_index = index;
            }
        }
        (min_distance <= threshold).then_some(min_index)
    }

    /// Expands the product of monomials into coefficient form.
    pub fn to_coefficient_form(&self) -> ComplexPolynomial {
        self.roots
            .iter()
            .map(monomial)
            .reduce(|acc, m| acc.multiply(&m))
            .unwrap_or_else(|| ComplexPolynomial {
                coefficients: vec![Complex::ONE],
            })
    }
}

/// `z - root`, as coefficients.
fn monomial(root: &Complex) -> ComplexPolynomial {
    ComplexPolynomial {
        coefficients: vec![-*root, Complex::ONE],
    }
}

impl fmt::Display for RootedPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f(z) = ")?;
        for (index, root) in self.roots.iter().enumerate() {
            if index != 0 {
                write!(f, " * ")?;
            }
            write!(f, "(z - {})", root)?;
        }
        Ok(())
    }
}
