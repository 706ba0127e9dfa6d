//! MultiHash stage: `fast("0" + s) + fast("1" + s) + ... + fast("{K-1}" + s)` per item.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::thread;

use crate::engine::hashing::{FastDigest, Signers};
use crate::error::{SignerError, StageResult};
use crate::utils::config::WorkerConsts;
use crate::{Item, Stage};

use super::workers::process_per_item;

/// Result of one fan-out branch, tagged with the slot it must land in.
struct OrderedFragment {
    slot: usize,
    value: String,
}

pub struct MultiHash {
    fast: Arc<dyn FastDigest>,
    fan_out: usize,
    workers: usize,
}

impl MultiHash {
    pub fn new(signers: &Signers, fan_out: usize) -> Self {
        Self {
            fast: Arc::clone(&signers.fast),
            fan_out,
            workers: WorkerConsts::DEFAULT_WORKERS,
        }
    }

    /// Items hashed concurrently; each in-flight item also holds `fan_out` branch threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn fan_out(&self) -> usize {
        self.fan_out
    }

    /// Digest `data` once per slot in parallel. Fragments arrive in any order and are placed by
    /// slot; the composite is read only after every branch has finished.
    pub fn hash_one(&self, data: &str) -> Result<String, SignerError> {
        let (fragment_tx, fragment_rx) =
            bounded::<Result<OrderedFragment, SignerError>>(self.fan_out);
        let mut slots: Vec<Option<String>> = vec![None; self.fan_out];
        let mut first_error = None;

        thread::scope(|s| {
            for slot in 0..self.fan_out {
                let fragment_tx = fragment_tx.clone();
                s.spawn(move || {
                    let fragment = self
                        .fast
                        .digest(&format!("{}{}", slot, data))
                        .map(|value| OrderedFragment { slot, value });
                    let _ = fragment_tx.send(fragment);
                });
            }
            drop(fragment_tx);

            for fragment in fragment_rx.iter() {
                match fragment {
                    Ok(OrderedFragment { slot, value }) => slots[slot] = Some(value),
                    Err(err) => {
                        first_error.get_or_insert(err);
                    }
                }
            }
        });

        if let Some(err) = first_error {
            return Err(err);
        }
        let parts = slots
            .into_iter()
            .enumerate()
            .map(|(slot, value)| {
                value.ok_or_else(|| SignerError::Failed {
                    digest: "multi_hash".to_string(),
                    reason: format!("slot {} produced no fragment", slot),
                })
            })
            .collect::<Result<Vec<String>, SignerError>>()?;
        Ok(parts.concat())
    }
}

impl Stage for MultiHash {
    fn name(&self) -> &str {
        "multi_hash"
    }

    fn run(&self, input: Receiver<Item>, output: Sender<Item>) -> StageResult {
        process_per_item(self.name(), input, output, self.workers, |item| {
            let data = item.into_text();
            Ok(Item::Text(self.hash_one(&data)?))
        })
    }
}
