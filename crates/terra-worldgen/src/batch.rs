//! Background generation of column regions with a worker pool.
//!
//! Offloads column building to background threads and delivers completed
//! regions through a bounded channel. Output is identical regardless of which
//! worker built a region.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, bounded};
use glam::IVec2;
use tracing::{debug, error};

use crate::column::Column;
use crate::error::WorldgenError;
use crate::generator::WorldgenCore;

/// Side length of a generated region, in columns.
pub const REGION_SIZE: i32 = 16;

/// A fully generated region.
#[derive(Debug)]
pub struct GeneratedRegion {
    /// Block coordinates of the region's minimum corner.
    pub origin: IVec2,
    /// Columns in row-major order (`x` fastest), or the first failure.
    pub columns: Result<Vec<Column>, WorldgenError>,
    /// Generation time in microseconds (for profiling).
    pub generation_time_us: u64,
}

/// Builds column regions on a pool of worker threads.
pub struct ColumnBatchGenerator {
    task_sender: Sender<IVec2>,
    result_receiver: Receiver<GeneratedRegion>,
    in_flight: Arc<AtomicU64>,
}

impl ColumnBatchGenerator {
    /// Create a generator over `core`.
    ///
    /// # Arguments
    /// - `thread_count`: Number of worker threads.
    /// - `queue_capacity`: Maximum queued regions. Excess submissions are rejected.
    /// - `result_capacity`: Bounded channel capacity for completed regions.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if a worker thread cannot be spawned.
    pub fn new(
        core: Arc<WorldgenCore>,
        thread_count: usize,
        queue_capacity: usize,
        result_capacity: usize,
    ) -> std::io::Result<Self> {
        let (task_sender, task_receiver) = bounded::<IVec2>(queue_capacity.max(1));
        let (result_sender, result_receiver) = bounded::<GeneratedRegion>(result_capacity.max(1));
        let in_flight = Arc::new(AtomicU64::new(0));

        for i in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let core = Arc::clone(&core);

            std::thread::Builder::new()
                .name(format!("column-gen-{i}"))
                .spawn(move || {
                    while let Ok(origin) = receiver.recv() {
                        let start = Instant::now();
                        let columns = generate_region_sync(&core, origin);
                        let elapsed = start.elapsed().as_micros() as u64;

                        if let Err(e) = &columns {
                            error!(%origin, error = %e, "Region generation failed");
                        }
                        // The receiver is gone once the generator is dropped.
                        let _ = sender.send(GeneratedRegion {
                            origin,
                            columns,
                            generation_time_us: elapsed,
                        });
                    }
                })?;
        }

        debug!(threads = thread_count.max(1), "Column batch generator started");

        Ok(Self {
            task_sender,
            result_receiver,
            in_flight,
        })
    }

    /// Create a generator with a thread count based on CPU cores.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if a worker thread cannot be spawned.
    pub fn with_defaults(core: Arc<WorldgenCore>) -> std::io::Result<Self> {
        let cpus = num_cpus::get().max(2);
        let threads = (cpus - 1).max(1);
        Self::new(core, threads, 64, 128)
    }

    /// Queue the region whose minimum corner is `origin`.
    ///
    /// Returns `Err(origin)` if the queue is full.
    pub fn submit(&self, origin: IVec2) -> Result<(), IVec2> {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        self.task_sender.try_send(origin).map_err(|e| {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            e.into_inner()
        })
    }

    /// Drain all completed regions from the result channel.
    pub fn drain_results(&self) -> Vec<GeneratedRegion> {
        let mut results = Vec::new();
        while let Ok(region) = self.result_receiver.try_recv() {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            results.push(region);
        }
        results
    }

    /// Block until the next region completes.
    pub fn recv(&self) -> Option<GeneratedRegion> {
        let region = self.result_receiver.recv().ok()?;
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
        Some(region)
    }

    /// Number of regions queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }
}

/// Build one region on the calling thread.
///
/// # Errors
///
/// Returns the first column error.
pub fn generate_region_sync(
    core: &WorldgenCore,
    origin: IVec2,
) -> Result<Vec<Column>, WorldgenError> {
    let mut columns = Vec::with_capacity((REGION_SIZE * REGION_SIZE) as usize);
    for dz in 0..REGION_SIZE {
        for dx in 0..REGION_SIZE {
            columns.push(core.build_column(origin.x + dx, origin.y + dz)?);
        }
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GenerationSettings;
    use std::time::Duration;

    fn core() -> Arc<WorldgenCore> {
        Arc::new(WorldgenCore::new(42, GenerationSettings::default()))
    }

    fn collect(generator: &ColumnBatchGenerator, expected: usize) -> Vec<GeneratedRegion> {
        let mut results = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(60);
        while results.len() < expected && Instant::now() < deadline {
            results.extend(generator.drain_results());
            if results.len() < expected {
                std::thread::sleep(Duration::from_millis(10));
            }
        }
        results
    }

    #[test]
    fn test_region_has_full_grid() {
        let core = core();
        let columns = generate_region_sync(&core, IVec2::new(32, -16)).expect("region");
        assert_eq!(columns.len(), 256);
        assert_eq!((columns[0].x, columns[0].z), (32, -16));
        assert_eq!((columns[17].x, columns[17].z), (33, -15));
    }

    #[test]
    fn test_concurrent_generation_matches_sync() {
        let core = core();
        let generator = ColumnBatchGenerator::new(Arc::clone(&core), 4, 32, 64).expect("spawn");

        let origins: Vec<IVec2> = (0..3)
            .flat_map(|x| (0..3).map(move |z| IVec2::new(x * 16 - 16, z * 16 - 16)))
            .collect();
        for origin in &origins {
            generator.submit(*origin).expect("queue has room");
        }

        let results = collect(&generator, origins.len());
        assert_eq!(results.len(), origins.len());
        for region in results {
            let expected = generate_region_sync(&core, region.origin).expect("region");
            assert_eq!(region.columns.expect("region"), expected);
        }
        assert_eq!(generator.in_flight_count(), 0);
    }

    #[test]
    fn test_failed_region_reports_error() {
        let core = core();
        let generator = ColumnBatchGenerator::new(core, 1, 4, 4).expect("spawn");
        generator
            .submit(IVec2::new(i32::MAX - 8, 0))
            .expect("queue has room");
        let region = generator.recv().expect("result");
        assert!(region.columns.is_err());
    }

    #[test]
    fn test_full_queue_rejects_submission() {
        let generator = ColumnBatchGenerator::new(core(), 1, 1, 1).expect("spawn");
        let rejected = (0..64)
            .map(|i| generator.submit(IVec2::new(i * 16, 0)))
            .filter(Result::is_err)
            .count();
        assert!(rejected > 0, "a one-slot queue must eventually reject work");
    }
}
