//! Library code for the Newton basin and ray-casting renderers.
//!
//! This crate holds the numeric kernels and data model; scheduling lives in `nr-render`.

pub mod complex;
pub mod error;
pub mod geometry;
pub mod image;
pub mod polynomial;
pub mod raster;
pub mod shading;
pub mod tolerance;
pub mod vector;

pub use complex::Complex;
pub use error::{ArithmeticError, GeometryError, ParseError, PolynomialError};
pub use polynomial::{ComplexPolynomial, RootedPolynomial};
pub use raster::{RasterProducer, ResultSink, RgbBuffers, RootBasins, Size, Viewport};
pub use vector::Vector3;
