//! Splitting a raster among worker threads.
//!
//! A [`Band`] is a mutable borrow of whole rows of one or more equally-sized buffers.
//! Bands are only ever produced by splitting a band in two, so two bands never overlap.

use std::ops::Range;

use nr_core::{ArithmeticError, Size};

use crate::Error;

/// How a raster is divided into tasks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Partition {
    /// One task renders every row on the calling thread.
    Sequential,
    /// `threads * lanes_per_thread` contiguous row ranges, each submitted as one task to a
    /// fixed pool that lives as long as the partitioner.
    StaticLanes { lanes_per_thread: usize },
    /// Recursive bisection of the row range on a work-stealing pool created for each run.
    /// A range of `rows` is rendered directly once `height / rows >= leaf_divisor`, i.e. once
    /// it is no more than about `1 / leaf_divisor` of the raster.
    ForkJoin { leaf_divisor: usize },
}

impl Partition {
    pub const DEFAULT_LANES: Partition = Partition::StaticLanes {
        lanes_per_thread: 8,
    };
    pub const DEFAULT_FORK_JOIN: Partition = Partition::ForkJoin { leaf_divisor: 16 };
}

/// What to do when some tasks of a render fail.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report an error for the whole request; the sink is not called.
    #[default]
    FailFast,
    /// Log the failures and deliver the raster anyway. Pixels a failed task did not reach
    /// keep their initial (zero) value.
    BestEffort,
}

/// Whole rows `[first_row, first_row + rows)` of each channel of a raster.
pub struct Band<'a, T> {
    first_row: usize,
    rows: usize,
    width: usize,
    channels: Vec<&'a mut [T]>,
}

impl<'a, T> Band<'a, T> {
    /// A band covering all of `size`. Every channel must hold `size.pixels()` values.
    pub fn new(size: Size, channels: Vec<&'a mut [T]>) -> Result<Self, Error> {
        if let Some(bad) = channels.iter().find(|c| c.len() != size.pixels()) {
            return Err(Error::InvalidArgument(format!(
                "channel of {} values does not match {} * {}",
                bad.len(),
                size.width,
                size.height
            )));
        }
        Ok(Band {
            first_row: 0,
            rows: size.height,
            width: size.width,
            channels,
        })
    }

    /// Absolute indices of the rows in this band.
    pub fn rows(&self) -> Range<usize> {
        self.first_row..self.first_row + self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Writes one value per channel for pixel `(x, y)`; `y` is an absolute row index.
    ///
    /// # Panics
    /// If the pixel is outside the band or `values` has the wrong number of channels.
    pub fn set(&mut self, x: usize, y: usize, values: &[T])
    where
        T: Copy,
    {
        assert_eq!(values.len(), self.channels.len(), "channel count mismatch");
        let offset = (y - self.first_row) * self.width + x;
        for (channel, value) in self.channels.iter_mut().zip(values) {
            channel[offset] = *value;
        }
    }

    /// This band's rows of one channel, row-major.
    pub fn channel_mut(&mut self, channel: usize) -> &mut [T] {
        &mut self.channels[channel][..]
    }

    /// Splits off the first `rows` rows.
    pub fn split_at(self, rows: usize) -> (Band<'a, T>, Band<'a, T>) {
        let rows = rows.min(self.rows);
        let mut top = Vec::with_capacity(self.channels.len());
        let mut bottom = Vec::with_capacity(self.channels.len());
        for channel in self.channels {
            let (a, b) = channel.split_at_mut(rows * self.width);
            top.push(a);
            bottom.push(b);
        }
        (
            Band {
                first_row: self.first_row,
                rows,
                width: self.width,
                channels: top,
            },
            Band {
                first_row: self.first_row + rows,
                rows: self.rows - rows,
                width: self.width,
                channels: bottom,
            },
        )
    }

    /// Splits into `lanes` bands of near-equal height, in row order.
    /// The first `rows % lanes` bands get one extra row.
    pub fn into_lanes(self, lanes: usize) -> Vec<Band<'a, T>> {
        let lanes = lanes.max(1);
        let base = self.rows / lanes;
        let extra = self.rows % lanes;
        let mut result = Vec::with_capacity(lanes);
        let mut rest = self;
        for lane in 0..lanes {
            let (head, tail) = rest.split_at(base + usize::from(lane < extra));
            result.push(head);
            rest = tail;
        }
        result
    }
}

/// Runs a per-band kernel over a raster according to a [`Partition`].
pub struct Partitioner {
    partition: Partition,
    threads: usize,
    policy: FailurePolicy,
    /// Present for [`Partition::StaticLanes`] only.
    pool: Option<rayon::ThreadPool>,
}

impl Partitioner {
    /// Partitioner using one thread per available CPU.
    pub fn new(partition: Partition) -> Result<Self, Error> {
        Self::with_threads(partition, num_cpus::get(), FailurePolicy::default())
    }

    pub fn with_threads(
        partition: Partition,
        threads: usize,
        policy: FailurePolicy,
    ) -> Result<Self, Error> {
        if threads < 1 {
            return Err(Error::InvalidArgument("must provide >=1 thread".to_string()));
        }
        let pool = match partition {
            Partition::StaticLanes { lanes_per_thread } => {
                if lanes_per_thread < 1 {
                    return Err(Error::InvalidArgument(
                        "must provide >=1 lane per thread".to_string(),
                    ));
                }
                Some(build_pool(threads, "nr-lane")?)
            }
            Partition::ForkJoin { leaf_divisor } if leaf_divisor < 1 => {
                return Err(Error::InvalidArgument(
                    "leaf divisor must be >=1".to_string(),
                ));
            }
            _ => None,
        };
        Ok(Partitioner {
            partition,
            threads,
            policy,
            pool,
        })
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Runs `kernel` once per task over disjoint bands covering `band`, then waits for all
    /// tasks. The outcome of every task is collected and judged by the failure policy.
    pub fn run<T, F>(&self, band: Band<'_, T>, kernel: F) -> Result<(), Error>
    where
        T: Send,
        F: Fn(&mut Band<'_, T>) -> Result<(), ArithmeticError> + Sync,
    {
        let outcomes = match (self.partition, &self.pool) {
            (Partition::Sequential, _) => {
                let mut band = band;
                vec![kernel(&mut band)]
            }
            (Partition::StaticLanes { lanes_per_thread }, Some(pool)) => {
                run_lanes(pool, band, self.threads * lanes_per_thread, &kernel)
            }
            (Partition::StaticLanes { .. }, None) => {
                return Err(Error::Internal("lane pool missing".to_string()));
            }
            (Partition::ForkJoin { leaf_divisor }, _) => {
                // The pool only lives for this call, and is shut down when dropped.
                let pool = build_pool(self.threads, "nr-fork")?;
                let height = band.row_count();
                pool.install(|| fork_join(band, height, leaf_divisor, &kernel))
            }
        };
        self.judge(outcomes)
    }

    fn judge(&self, outcomes: Vec<Result<(), ArithmeticError>>) -> Result<(), Error> {
        let total = outcomes.len();
        let failures: Vec<ArithmeticError> =
            outcomes.into_iter().filter_map(Result::err).collect();
        let Some(first) = failures.first().cloned() else {
            return Ok(());
        };
        for err in &failures {
            tracing::warn!("partition failed: {}", err);
        }
        match self.policy {
            FailurePolicy::FailFast => {
                tracing::error!("{} of {} partitions failed", failures.len(), total);
                Err(Error::PartitionFailed {
                    failed: failures.len(),
                    total,
                    first,
                })
            }
            FailurePolicy::BestEffort => {
                tracing::warn!(
                    "{} of {} partitions failed; delivering partial result",
                    failures.len(),
                    total
                );
                Ok(())
            }
        }
    }
}

fn build_pool(threads: usize, name: &'static str) -> Result<rayon::ThreadPool, Error> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |i| format!("{}-{}", name, i))
        .build()
        .map_err(|v| Error::Internal(format!("error creating thread pool: {}", v)))
}

fn run_lanes<T, F>(
    pool: &rayon::ThreadPool,
    band: Band<'_, T>,
    lanes: usize,
    kernel: &F,
) -> Vec<Result<(), ArithmeticError>>
where
    T: Send,
    F: Fn(&mut Band<'_, T>) -> Result<(), ArithmeticError> + Sync,
{
    let lanes: Vec<_> = band
        .into_lanes(lanes)
        .into_iter()
        .filter(|lane| lane.row_count() > 0)
        .collect();
    let mut outcomes: Vec<Result<(), ArithmeticError>> = lanes.iter().map(|_| Ok(())).collect();

    // The scope is the join point: it returns once every lane has finished.
    pool.scope(|scope| {
        for (mut lane, outcome) in lanes.into_iter().zip(outcomes.iter_mut()) {
            scope.spawn(move |_| {
                tracing::trace!("lane rows {:?}", lane.rows());
                *outcome = kernel(&mut lane);
            });
        }
    });
    outcomes
}

fn fork_join<T, F>(
    mut band: Band<'_, T>,
    height: usize,
    leaf_divisor: usize,
    kernel: &F,
) -> Vec<Result<(), ArithmeticError>>
where
    T: Send,
    F: Fn(&mut Band<'_, T>) -> Result<(), ArithmeticError> + Sync,
{
    let rows = band.row_count();
    if rows <= 1 || height / rows >= leaf_divisor {
        tracing::trace!("leaf rows {:?}", band.rows());
        return vec![kernel(&mut band)];
    }
    let (top, bottom) = band.split_at(rows / 2);
    let (mut a, b) = rayon::join(
        || fork_join(top, height, leaf_divisor, kernel),
        || fork_join(bottom, height, leaf_divisor, kernel),
    );
    a.extend(b);
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Adds one to every pixel of the band.
    fn touch(band: &mut Band<'_, u32>) -> Result<(), ArithmeticError> {
        for value in band.channel_mut(0).iter_mut() {
            *value += 1;
        }
        Ok(())
    }

    fn strategies() -> Vec<Partitioner> {
        vec![
            Partitioner::with_threads(Partition::Sequential, 1, FailurePolicy::FailFast).unwrap(),
            Partitioner::with_threads(Partition::DEFAULT_LANES, 3, FailurePolicy::FailFast)
                .unwrap(),
            Partitioner::with_threads(
                Partition::StaticLanes {
                    lanes_per_thread: 1,
                },
                4,
                FailurePolicy::FailFast,
            )
            .unwrap(),
            Partitioner::with_threads(Partition::DEFAULT_FORK_JOIN, 3, FailurePolicy::FailFast)
                .unwrap(),
            Partitioner::with_threads(
                Partition::ForkJoin { leaf_divisor: 1 },
                2,
                FailurePolicy::FailFast,
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_every_pixel_written_once() {
        let sizes = [
            Size::new(7, 5),
            Size::new(1, 100),
            Size::new(33, 1),
            Size::new(0, 10),
            Size::new(10, 0),
            Size::new(64, 257),
        ];
        for partitioner in strategies() {
            for size in sizes {
                let mut data = vec![0u32; size.pixels()];
                let band = Band::new(size, vec![data.as_mut_slice()]).unwrap();
                partitioner.run(band, touch).unwrap();
                assert!(
                    data.iter().all(|v| *v == 1),
                    "{:?} on {:?} did not write every pixel exactly once",
                    partitioner.partition(),
                    size
                );
            }
        }
    }

    #[test]
    fn test_rows_are_absolute() {
        let size = Size::new(3, 40);
        for partitioner in strategies() {
            let mut data = vec![0u32; size.pixels()];
            let band = Band::new(size, vec![data.as_mut_slice()]).unwrap();
            partitioner
                .run(band, |band| {
                    for y in band.rows() {
                        for x in 0..band.width() {
                            band.set(x, y, &[size.offset(x, y) as u32]);
                        }
                    }
                    Ok(())
                })
                .unwrap();
            let expected: Vec<u32> = (0..size.pixels() as u32).collect();
            assert_eq!(data, expected, "{:?}", partitioner.partition());
        }
    }

    #[test]
    fn test_multiple_channels() {
        let size = Size::new(4, 4);
        let (mut a, mut b) = (vec![0u8; 16], vec![0u8; 16]);
        let band = Band::new(size, vec![a.as_mut_slice(), b.as_mut_slice()]).unwrap();
        let (top, mut bottom) = band.split_at(1);
        assert_eq!(top.rows(), 0..1);
        assert_eq!(bottom.rows(), 1..4);
        bottom.set(2, 3, &[5, 6]);
        assert_eq!(a[size.offset(2, 3)], 5);
        assert_eq!(b[size.offset(2, 3)], 6);
    }

    #[test]
    fn test_mismatched_channel() {
        let mut data = vec![0u8; 5];
        assert!(Band::new(Size::new(2, 2), vec![data.as_mut_slice()]).is_err());
    }

    #[test]
    fn test_lanes_are_balanced() {
        let mut data = vec![0u8; 10];
        let band = Band::new(Size::new(1, 10), vec![data.as_mut_slice()]).unwrap();
        let rows: Vec<_> = band.into_lanes(4).iter().map(|l| l.rows()).collect();
        assert_eq!(rows, vec![0..3, 3..6, 6..8, 8..10]);
    }

    #[test]
    fn test_fork_join_leaves() {
        // 64 rows with a divisor of 4: leaves of 16 rows each.
        let partitioner =
            Partitioner::with_threads(Partition::ForkJoin { leaf_divisor: 4 }, 2, FailurePolicy::FailFast)
                .unwrap();
        let mut data = vec![0u32; 64];
        let band = Band::new(Size::new(1, 64), vec![data.as_mut_slice()]).unwrap();
        partitioner
            .run(band, |band| {
                let rows = band.row_count() as u32;
                band.channel_mut(0).iter_mut().for_each(|v| *v = rows);
                Ok(())
            })
            .unwrap();
        assert!(data.iter().all(|v| *v == 16), "{:?}", data);
    }

    fn fail_on_row_zero(band: &mut Band<'_, u32>) -> Result<(), ArithmeticError> {
        if band.rows().contains(&0) {
            return Err(ArithmeticError::DivisionByZero);
        }
        touch(band)
    }

    #[test]
    fn test_fail_fast() {
        for partition in [
            Partition::Sequential,
            Partition::DEFAULT_LANES,
            Partition::DEFAULT_FORK_JOIN,
        ] {
            let partitioner =
                Partitioner::with_threads(partition, 2, FailurePolicy::FailFast).unwrap();
            let mut data = vec![0u32; 64];
            let band = Band::new(Size::new(2, 32), vec![data.as_mut_slice()]).unwrap();
            match partitioner.run(band, fail_on_row_zero) {
                Err(Error::PartitionFailed { failed, first, .. }) => {
                    assert_eq!(failed, 1);
                    assert_eq!(first, ArithmeticError::DivisionByZero);
                }
                other => panic!("{:?}: expected failure, got {:?}", partition, other),
            }
        }
    }

    #[test]
    fn test_best_effort() {
        let partitioner =
            Partitioner::with_threads(Partition::DEFAULT_LANES, 2, FailurePolicy::BestEffort)
                .unwrap();
        let size = Size::new(2, 32);
        let mut data = vec![0u32; size.pixels()];
        let band = Band::new(size, vec![data.as_mut_slice()]).unwrap();
        partitioner.run(band, fail_on_row_zero).unwrap();
        // 16 lanes of two rows; only the first one failed.
        assert_eq!(data[..4], [0, 0, 0, 0]);
        assert!(data[4..].iter().all(|v| *v == 1));
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(Partitioner::with_threads(Partition::Sequential, 0, FailurePolicy::FailFast)
            .is_err());
        assert!(Partitioner::with_threads(
            Partition::StaticLanes {
                lanes_per_thread: 0
            },
            1,
            FailurePolicy::FailFast
        )
        .is_err());
        assert!(Partitioner::with_threads(
            Partition::ForkJoin { leaf_divisor: 0 },
            1,
            FailurePolicy::FailFast
        )
        .is_err());
    }
}
