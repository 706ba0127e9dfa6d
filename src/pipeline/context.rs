//! Queue wiring: one bounded queue per stage, linked by index.

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::Item;
use crate::error::{PipelineError, StageResult};

/// Input and output queue of one stage. Link `i`'s input is link `i - 1`'s output.
pub struct QueueLink {
    pub input: Receiver<Item>,
    pub output: Sender<Item>,
}

/// Links for every stage, plus the reader of the last stage's output.
pub struct QueueLinks {
    pub links: Vec<QueueLink>,
    pub final_rx: Receiver<Item>,
}

/// Create `stage_count` bounded queues of `queue_cap` each. `source` feeds the first stage.
pub fn create_queue_links(
    source: Receiver<Item>,
    stage_count: usize,
    queue_cap: usize,
) -> QueueLinks {
    let mut links = Vec::with_capacity(stage_count);
    let mut input = source;
    for _ in 0..stage_count {
        let (output, next_input) = bounded::<Item>(queue_cap);
        links.push(QueueLink { input, output });
        input = next_input;
    }
    QueueLinks {
        links,
        final_rx: input,
    }
}

/// Send one result downstream. A closed queue means a later stage aborted.
pub fn send_item(output: &Sender<Item>, item: Item, stage: &str) -> StageResult {
    output
        .send(item)
        .map_err(|_| PipelineError::Disconnected {
            stage: stage.to_string(),
        })
}
