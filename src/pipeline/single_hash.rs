//! SingleHash stage: `fast(raw) ~ fast(slow(raw))` per item.
//!
//! Items run in parallel; only the slow digest call is serialized, through the
//! [`AdmissionGate`](crate::engine::gate::AdmissionGate) shared by every in-flight item.

use crossbeam_channel::{Receiver, Sender};
use std::panic;
use std::thread;

use crate::engine::hashing::Signers;
use crate::error::{SignerError, StageResult};
use crate::utils::config::{SINGLE_HASH_SEPARATOR, WorkerConsts};
use crate::{Item, Stage};

use super::workers::process_per_item;

pub struct SingleHash {
    signers: Signers,
    workers: usize,
}

impl SingleHash {
    pub fn new(signers: &Signers) -> Self {
        Self {
            signers: signers.clone(),
            workers: WorkerConsts::DEFAULT_WORKERS,
        }
    }

    /// Items hashed concurrently; each in-flight item also holds one thread for `fast(raw)`.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Hash one raw value. `fast(raw)` runs on its own thread while this thread waits for the
    /// gate, runs the slow digest and hashes its result.
    pub fn hash_one(&self, raw: &str) -> Result<String, SignerError> {
        thread::scope(|s| {
            let fast_raw = s.spawn(|| self.signers.fast.digest(raw));
            let fast_slow = self
                .signers
                .slow_digest(raw)
                .and_then(|slow| self.signers.fast.digest(&slow));
            let fast_raw = fast_raw
                .join()
                .unwrap_or_else(|payload| panic::resume_unwind(payload));
            Ok(format!(
                "{}{}{}",
                fast_raw?, SINGLE_HASH_SEPARATOR, fast_slow?
            ))
        })
    }
}

impl Stage for SingleHash {
    fn name(&self) -> &str {
        "single_hash"
    }

    fn run(&self, input: Receiver<Item>, output: Sender<Item>) -> StageResult {
        process_per_item(self.name(), input, output, self.workers, |item| {
            let raw = item.into_text();
            Ok(Item::Text(self.hash_one(&raw)?))
        })
    }
}
