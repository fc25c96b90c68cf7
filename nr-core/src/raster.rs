//! Raster buffers and the contracts between producers and their consumers.

use crate::Complex;

/// A pair of integer (width, height) dimensions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Size { width, height }
    }

    /// Number of pixels in the raster.
    pub const fn pixels(&self) -> usize {
        self.width * self.height
    }

    /// Index of pixel `(x, y)` in a row-major buffer.
    pub const fn offset(&self, x: usize, y: usize) -> usize {
        x + y * self.width
    }
}

/// Rectangle of the complex plane shown by a fractal render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub re_min: f64,
    pub re_max: f64,
    pub im_min: f64,
    pub im_max: f64,
}

impl Viewport {
    pub const fn new(re_min: f64, re_max: f64, im_min: f64, im_max: f64) -> Self {
        Viewport {
            re_min,
            re_max,
            im_min,
            im_max,
        }
    }

    /// Complex coordinate of pixel `(x, y)`.
    ///
    /// Columns run from `re_min` to `re_max`. Rows run downward, from `im_max` at row 0 to
    /// `im_min` at the last row.
    pub fn to_complex(&self, x: usize, y: usize, size: Size) -> Complex {
        let re = fraction(x, size.width) * (self.re_max - self.re_min) + self.re_min;
        let im = self.im_max - fraction(y, size.height) * (self.im_max - self.im_min);
        Complex::new(re, im)
    }
}

/// `i / (n - 1)`: position of pixel `i` among `n`, from 0 to 1. Zero if `n` is 1.
pub(crate) fn fraction(i: usize, n: usize) -> f64 {
    if n <= 1 {
        0.0
    } else {
        i as f64 / (n - 1) as f64
    }
}

/// Finished output of a Newton fractal render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootBasins {
    pub size: Size,
    /// Per pixel: index of the root the pixel converged to, plus one; zero if unclassified.
    pub data: Vec<u16>,
    /// Number of distinct values `data` may hold (root count plus one).
    pub classes: u16,
}

/// Finished output of a ray-cast render, one buffer per channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbBuffers {
    pub size: Size,
    pub red: Vec<u8>,
    pub green: Vec<u8>,
    pub blue: Vec<u8>,
}

impl RgbBuffers {
    /// Black buffers of the given size.
    pub fn new(size: Size) -> Self {
        RgbBuffers {
            size,
            red: vec![0; size.pixels()],
            green: vec![0; size.pixels()],
            blue: vec![0; size.pixels()],
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let offset = self.size.offset(x, y);
        [self.red[offset], self.green[offset], self.blue[offset]]
    }
}

/// Consumer of finished renders, e.g. a viewer or an image writer.
///
/// A producer calls `accept_result` exactly once per successful request, after every
/// partition of the raster has finished.
pub trait ResultSink<T> {
    fn accept_result(&mut self, result: T, request_id: u64);
}

/// Sinks that just hand back the last result.
impl<T> ResultSink<T> for Option<(T, u64)> {
    fn accept_result(&mut self, result: T, request_id: u64) {
        *self = Some((result, request_id));
    }
}

/// Something that renders a raster for a view and reports it to a sink.
pub trait RasterProducer {
    /// What to look at: a region of the complex plane, a camera, ...
    type View;
    /// What the sink receives.
    type Output;
    type Error;

    /// Renders `view` at `size` and passes the result to `sink`.
    ///
    /// Blocks until the sink has been called. The request id is handed to the sink as-is.
    fn produce(
        &self,
        view: &Self::View,
        size: Size,
        request_id: u64,
        sink: &mut dyn ResultSink<Self::Output>,
    ) -> Result<(), Self::Error>;
}
