//! Error types for the numeric kernels.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("cannot normalize a vector of zero norm")]
    ZeroNorm,

    #[error("cosine is undefined for a zero-length vector")]
    ZeroDenominator,

    #[error("root order must be positive")]
    ZeroRootOrder,
}

/// Failure to read a complex literal.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("cannot parse a complex number from empty input")]
    Empty,

    #[error("cannot parse number '{0}'")]
    InvalidNumber(String),

    #[error("two operators in a row at token {0}")]
    AdjacentOperators(usize),

    #[error("imaginary unit must precede its value ('i2.5', not '2.5i')")]
    ImaginaryAfterNumber,

    #[error("operator at the end of input")]
    DanglingOperator,

    #[error("no tokens left after end of input")]
    PastEnd,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum PolynomialError {
    #[error("polynomial needs at least one coefficient")]
    NoCoefficients,

    #[error("polynomial needs at least one root")]
    NoRoots,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("sphere radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}
