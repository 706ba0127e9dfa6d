use log::warn;
use std::sync::{Mutex, PoisonError};

use crate::error::{PipelineError, StageResult};

/// First failure recorded by any per-item task of a stage. A disconnect is replaced by a
/// later root-cause error, never the other way round.
#[derive(Default)]
pub struct FirstError {
    slot: Mutex<Option<PipelineError>>,
}

impl FirstError {
    pub fn record(&self, err: PipelineError) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            None => *slot = Some(err),
            Some(prev) if prev.is_disconnect() && !err.is_disconnect() => *slot = Some(err),
            Some(_) => {}
        }
    }

    pub fn is_set(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn into_result(self) -> StageResult {
        match self.slot.into_inner().unwrap_or_else(PoisonError::into_inner) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Reduce every stage outcome to one result. Returns the first root-cause error; a
/// disconnect is only returned when no stage reported anything else.
/// Call after every stage has been joined.
pub fn resolve_stage_outcomes(outcomes: Vec<(String, StageResult)>) -> StageResult {
    let mut disconnect = None;
    for (stage, outcome) in outcomes {
        match outcome {
            Ok(()) => {}
            Err(err) if err.is_disconnect() => {
                disconnect.get_or_insert(err);
            }
            Err(err) => {
                warn!("stage '{}' aborted the run: {}", stage, err);
                return Err(err);
            }
        }
    }
    match disconnect {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
