use nr_core::{
    geometry::{Camera, Frame, Scene},
    shading, ArithmeticError, RasterProducer, ResultSink, RgbBuffers, Size,
};

use crate::{Band, Error, FailurePolicy, Partition, Partitioner};

/// Casts one ray per pixel into a scene and shades the closest hit.
pub struct RayCaster {
    scene: Scene,
    partitioner: Partitioner,
}

impl RayCaster {
    /// Renders every row on the calling thread.
    pub fn sequential(scene: Scene) -> Result<Self, Error> {
        Ok(Self::with_partitioner(
            scene,
            Partitioner::with_threads(Partition::Sequential, 1, FailurePolicy::default())?,
        ))
    }

    /// Renders by recursive fork-join, on a pool of one thread per CPU created per request.
    pub fn parallel(scene: Scene) -> Result<Self, Error> {
        Ok(Self::with_partitioner(
            scene,
            Partitioner::new(Partition::DEFAULT_FORK_JOIN)?,
        ))
    }

    pub fn with_partitioner(scene: Scene, partitioner: Partitioner) -> Self {
        RayCaster { scene, partitioner }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn fill(&self, frame: &Frame, size: Size, band: &mut Band<'_, u8>) -> Result<(), ArithmeticError> {
        for y in band.rows() {
            for x in 0..size.width {
                let ray = frame.ray_through(x, y, size)?;
                band.set(x, y, &shading::trace(&self.scene, &ray)?);
            }
        }
        Ok(())
    }
}

impl RasterProducer for RayCaster {
    type View = Camera;
    type Output = RgbBuffers;
    type Error = Error;

    fn produce(
        &self,
        camera: &Camera,
        size: Size,
        request_id: u64,
        sink: &mut dyn ResultSink<RgbBuffers>,
    ) -> Result<(), Error> {
        let _span = tracing::info_span!("raycast", request_id).entered();
        tracing::info!(
            "rendering {}x{} with {:?} on {} threads",
            size.width,
            size.height,
            self.partitioner.partition(),
            self.partitioner.threads()
        );

        let frame = camera.frame()?;
        tracing::debug!("camera frame: {:?}", frame);

        let mut buffers = RgbBuffers::new(size);
        let band = Band::new(
            size,
            vec![
                buffers.red.as_mut_slice(),
                buffers.green.as_mut_slice(),
                buffers.blue.as_mut_slice(),
            ],
        )?;
        self.partitioner
            .run(band, |band| self.fill(&frame, size, band))?;

        tracing::info!("render complete");
        sink.accept_result(buffers, request_id);
        Ok(())
    }
}
