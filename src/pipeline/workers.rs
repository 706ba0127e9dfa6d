//! Per-item worker pool: a fixed number of workers share one input queue.

use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::Item;
use crate::error::{PipelineError, StageResult};

use super::context::send_item;
use super::error_handler::FirstError;

/// Single worker: take items from `input` until it closes (or another worker failed), run `task`,
/// send the result on `output`.
fn worker_loop<F>(
    stage: &str,
    input: Receiver<Item>,
    output: Sender<Item>,
    task: &F,
    first_error: &FirstError,
    processed: &AtomicUsize,
) where
    F: Fn(Item) -> Result<Item, PipelineError>,
{
    while !first_error.is_set() {
        let Ok(item) = input.recv() else {
            break;
        };
        if let Err(err) = task(item).and_then(|out| send_item(&output, out, stage)) {
            first_error.record(err);
            break;
        }
        processed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Run `task` for every item of `input` on `workers` threads and forward each result to
/// `output`. At most `workers` items are in flight at once. Stops reading after the first
/// failure.
///
/// Returns only after every worker has finished writing, so the caller can drop `output`
/// without racing an outstanding send.
pub fn process_per_item<F>(
    stage: &str,
    input: Receiver<Item>,
    output: Sender<Item>,
    workers: usize,
    task: F,
) -> StageResult
where
    F: Fn(Item) -> Result<Item, PipelineError> + Sync,
{
    let first_error = FirstError::default();
    let processed = AtomicUsize::new(0);
    let workers = workers.max(1);
    thread::scope(|s| {
        for _ in 0..workers {
            let input = input.clone();
            let output = output.clone();
            let (task, first_error, processed) = (&task, &first_error, &processed);
            s.spawn(move || worker_loop(stage, input, output, task, first_error, processed));
        }
    });
    debug!(
        "{}: {} items processed by {} workers",
        stage,
        processed.into_inner(),
        workers
    );
    first_error.into_result()
}
