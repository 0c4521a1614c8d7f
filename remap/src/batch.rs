//! Running a job for every class on a fixed number of threads.
//!
//! The items are split into one contiguous range per worker, and every worker goes through its range in order.

use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use anyhow::Result;
use log::{debug, error};

/// Counts of the items of a [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
	pub processed: usize,
	pub failed: usize,
}

impl BatchReport {
	fn add(&mut self, other: BatchReport) {
		self.processed += other.processed;
		self.failed += other.failed;
	}
}

/// The number of workers to use if nothing else is specified: the available parallelism, or `1` if that's unknown.
pub fn default_workers() -> usize {
	thread::available_parallelism()
		.map(usize::from)
		.unwrap_or(1)
}

/// Splits `0..len` into `workers` contiguous ranges.
///
/// The range `i` starts at `len * i / workers`, and the last range ends at `len`. A worker count of `0` is taken
/// as `1`.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
	let workers = workers.max(1);

	let bounds: Vec<usize> = (0..workers)
		.map(|i| len * i / workers)
		.chain(std::iter::once(len))
		.collect();

	bounds.windows(2)
		.map(|window| window[0]..window[1])
		.collect()
}

/// Calls `f` on all items, using `workers` threads.
///
/// Errors and panics of `f` are logged and counted, they don't stop any other items from being processed.
/// Returns once all items are done.
pub fn run<T, F>(items: Vec<T>, workers: usize, f: F) -> BatchReport
where
	T: Send,
	F: Fn(T) -> Result<()> + Sync,
{
	let ranges = partition(items.len(), workers);

	let mut items = items;
	let mut chunks: Vec<Vec<T>> = Vec::with_capacity(ranges.len());
	for range in ranges.iter().rev() {
		chunks.push(items.split_off(range.start));
	}
	chunks.reverse();

	let f = &f;
	thread::scope(|scope| {
		let handles: Vec<_> = chunks.into_iter()
			.enumerate()
			.map(|(worker, chunk)| {
				let len = chunk.len();
				let handle = scope.spawn(move || {
					debug!("worker {worker} got {len} items");

					let mut report = BatchReport::default();
					for item in chunk {
						// the item is gone after a panic, so nothing broken is seen afterwards
						match panic::catch_unwind(AssertUnwindSafe(|| f(item))) {
							Ok(Ok(())) => report.processed += 1,
							Ok(Err(e)) => {
								error!("{e:#}");
								report.failed += 1;
							},
							Err(_) => {
								error!("worker {worker} panicked on an item, skipping it");
								report.failed += 1;
							},
						}
					}
					report
				});
				(worker, len, handle)
			})
			.collect();

		let mut report = BatchReport::default();
		for (worker, len, handle) in handles {
			match handle.join() {
				Ok(worker_report) => report.add(worker_report),
				Err(_) => {
					error!("worker {worker} panicked, counting all its {len} items as failed");
					report.failed += len;
				},
			}
		}
		report
	})
}
