//! Render engines for Newton basins and ray-cast scenes.
//!
//! Both engines compute one value per pixel and differ only in the kernel. How the raster is
//! split among threads is a [`Partition`] chosen per engine:
//! -   Newton basins default to static lanes: `threads * 8` contiguous row ranges, each one task
//!     on a fixed pool owned by the engine.
//! -   The parallel ray caster defaults to fork-join: row ranges are bisected until small, on a
//!     work-stealing pool built for each request.
//!
//! Every task borrows a disjoint band of rows of the output buffers, so no locking is needed.
//! The sink is called once, after every band has finished.

use nr_core::ArithmeticError;
use thiserror::Error;

mod newton;
mod partition;
mod raycast;

pub use newton::{NewtonParams, NewtonProducer};
pub use partition::{Band, FailurePolicy, Partition, Partitioner};
pub use raycast::RayCaster;

/// Errors that can occur during execution.
#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    #[error("{failed} of {total} partitions failed, first error: {first}")]
    PartitionFailed {
        failed: usize,
        total: usize,
        first: ArithmeticError,
    },

    #[error("internal error: {0}")]
    Internal(String),
}
