use nr_core::{
    ArithmeticError, Complex, ComplexPolynomial, RasterProducer, ResultSink, RootBasins,
    RootedPolynomial, Size, Viewport,
};

use crate::{Band, Error, Partition, Partitioner};

/// Tuning of the Newton-Raphson iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NewtonParams {
    /// Iteration stops once a step moves `z` by no more than this.
    pub convergence_threshold: f64,
    /// A final `z` further than this from every root is left unclassified.
    pub root_threshold: f64,
    pub max_iterations: usize,
}

impl Default for NewtonParams {
    fn default() -> Self {
        NewtonParams {
            convergence_threshold: 1e-4,
            root_threshold: 2e-4,
            max_iterations: 4096,
        }
    }
}

/// Renders the basins of attraction of a polynomial's roots under Newton's method.
///
/// Each pixel holds the index of the root its starting point converges to, plus one,
/// or zero if it converges to none of them.
pub struct NewtonProducer {
    polynomial: RootedPolynomial,
    derived: ComplexPolynomial,
    classes: u16,
    params: NewtonParams,
    partitioner: Partitioner,
}

impl NewtonProducer {
    /// Producer with default parameters, rendering in static lanes on one thread per CPU.
    pub fn new(polynomial: RootedPolynomial) -> Result<Self, Error> {
        Self::with_options(
            polynomial,
            NewtonParams::default(),
            Partitioner::new(Partition::DEFAULT_LANES)?,
        )
    }

    pub fn with_options(
        polynomial: RootedPolynomial,
        params: NewtonParams,
        partitioner: Partitioner,
    ) -> Result<Self, Error> {
        let valid = |t: f64| !t.is_nan() && t >= 0.0;
        if !valid(params.convergence_threshold) || !valid(params.root_threshold) {
            return Err(Error::InvalidArgument(format!(
                "thresholds must be non-negative: {:?}",
                params
            )));
        }
        let coefficients = polynomial.to_coefficient_form();
        let classes = u16::try_from(coefficients.order() + 1).map_err(|_| {
            Error::InvalidArgument(format!(
                "too many roots for a basin raster: {}",
                polynomial.roots().len()
            ))
        })?;
        tracing::debug!("newton producer for {}", polynomial);
        Ok(NewtonProducer {
            derived: coefficients.derive(),
            polynomial,
            classes,
            params,
            partitioner,
        })
    }

    pub fn polynomial(&self) -> &RootedPolynomial {
        &self.polynomial
    }

    pub fn params(&self) -> &NewtonParams {
        &self.params
    }

    /// Runs Newton's method from `start` and returns where it stopped.
    ///
    /// Stops early on a zero derivative, leaving `z` where it was.
    pub fn iterate(&self, start: Complex) -> Result<Complex, ArithmeticError> {
        let mut z = start;
        for _ in 0..self.params.max_iterations {
            let denominator = self.derived.apply(z);
            if denominator == Complex::ZERO {
                break;
            }
            let next = z - self.polynomial.apply(z).divide(denominator)?;
            let step = next.distance(z);
            z = next;
            if step <= self.params.convergence_threshold {
                break;
            }
        }
        Ok(z)
    }

    /// Index of the root that `start` converges to, if any.
    pub fn classify(&self, start: Complex) -> Result<Option<usize>, ArithmeticError> {
        let z = self.iterate(start)?;
        Ok(self
            .polynomial
            .index_of_closest_root(z, self.params.root_threshold))
    }

    fn fill(
        &self,
        viewport: &Viewport,
        size: Size,
        band: &mut Band<'_, u16>,
    ) -> Result<(), ArithmeticError> {
        for y in band.rows() {
            for x in 0..size.width {
                let class = match self.classify(viewport.to_complex(x, y, size))? {
                    // Bounded by `classes`, checked at construction.
                    Some(index) => index as u16 + 1,
                    None => 0,
                };
                band.set(x, y, &[class]);
            }
        }
        Ok(())
    }
}

impl RasterProducer for NewtonProducer {
    type View = Viewport;
    type Output = RootBasins;
    type Error = Error;

    fn produce(
        &self,
        viewport: &Viewport,
        size: Size,
        request_id: u64,
        sink: &mut dyn ResultSink<RootBasins>,
    ) -> Result<(), Error> {
        let _span = tracing::info_span!("newton", request_id).entered();
        tracing::info!(
            "rendering {}x{} over {:?} with {:?}",
            size.width,
            size.height,
            viewport,
            self.partitioner.partition()
        );

        let mut data = vec![0u16; size.pixels()];
        let band = Band::new(size, vec![data.as_mut_slice()])?;
        self.partitioner
            .run(band, |band| self.fill(viewport, size, band))?;

        tracing::info!("render complete");
        sink.accept_result(
            RootBasins {
                size,
                data,
                classes: self.classes,
            },
            request_id,
        );
        Ok(())
    }
}
