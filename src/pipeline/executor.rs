//! Stage composition: wires stages with bounded queues and drives them to completion.

use crossbeam_channel::{Receiver, Sender, bounded};
use log::debug;
use std::thread;

use crate::Item;
use crate::error::{PipelineError, StageResult};

use super::context::{QueueLink, QueueLinks, create_queue_links};
use super::error_handler::resolve_stage_outcomes;

/// One pipeline step: consume `input` until it is closed, write results to `output`.
///
/// The executor closes `output` as soon as `run` returns, so a stage must not return while any
/// task it spawned may still write.
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;
    fn run(&self, input: Receiver<Item>, output: Sender<Item>) -> StageResult;
}

/// A stage backed by a closure.
pub struct FnStage<F> {
    name: String,
    f: F,
}

impl<F> FnStage<F>
where
    F: Fn(Receiver<Item>, Sender<Item>) -> StageResult + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Stage for FnStage<F>
where
    F: Fn(Receiver<Item>, Sender<Item>) -> StageResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, input: Receiver<Item>, output: Sender<Item>) -> StageResult {
        (self.f)(input, output)
    }
}

/// Run every stage concurrently, `source` feeding the first one. Blocks until the last queue is
/// closed and drained; returns what was drained from it.
///
/// With no stages the source itself is the last queue.
pub fn execute_pipeline(
    source: Receiver<Item>,
    stages: &[Box<dyn Stage>],
    queue_cap: usize,
) -> Result<Vec<Item>, PipelineError> {
    debug!(
        "pipeline: {} stages, queue capacity {}",
        stages.len(),
        queue_cap
    );
    let QueueLinks { links, final_rx } = create_queue_links(source, stages.len(), queue_cap);

    let (drained, outcomes) = thread::scope(|s| {
        let handles: Vec<_> = stages
            .iter()
            .zip(links)
            .map(|(stage, QueueLink { input, output })| {
                s.spawn(move || {
                    debug!("{}: started", stage.name());
                    let outcome = stage.run(input, output);
                    debug!("{}: output closed", stage.name());
                    outcome
                })
            })
            .collect();

        let drained: Vec<Item> = final_rx.iter().collect();
        debug!("pipeline: final queue closed after {} items", drained.len());

        let outcomes: Vec<(String, StageResult)> = stages
            .iter()
            .zip(handles)
            .map(|(stage, handle)| {
                let name = stage.name().to_string();
                let outcome = handle.join().unwrap_or_else(|_| {
                    Err(PipelineError::StagePanicked {
                        stage: name.clone(),
                    })
                });
                (name, outcome)
            })
            .collect();
        (drained, outcomes)
    });

    resolve_stage_outcomes(outcomes)?;
    Ok(drained)
}

/// Feed `items` into a fresh source queue on its own thread and run the pipeline over it.
/// The source is closed after the last item.
pub fn run_pipeline(
    items: Vec<Item>,
    stages: &[Box<dyn Stage>],
    queue_cap: usize,
) -> Result<Vec<Item>, PipelineError> {
    let (source_tx, source_rx) = bounded::<Item>(queue_cap);
    thread::scope(|s| {
        s.spawn(move || feed_source(source_tx, items));
        execute_pipeline(source_rx, stages, queue_cap)
    })
}

fn feed_source(source_tx: Sender<Item>, items: Vec<Item>) {
    let total = items.len();
    for (sent, item) in items.into_iter().enumerate() {
        if source_tx.send(item).is_err() {
            debug!("source: first stage hung up after {} of {} items", sent, total);
            return;
        }
    }
    debug!("source: {} items fed", total);
}
