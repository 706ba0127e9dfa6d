//! Typed failures for digest primitives and pipeline stages.
//!
//! Any error aborts the whole run; there is no per-item recovery.

use thiserror::Error;

/// Failure raised by a digest primitive.
#[derive(Error, Debug)]
pub enum SignerError {
    /// A second call entered a digest that allows only one in flight.
    #[error("{digest} digest overheated: concurrent call detected")]
    Overheat { digest: &'static str },

    #[error("{digest} digest failed: {reason}")]
    Failed { digest: String, reason: String },
}

/// Failure of a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    /// The stage's output queue lost its reader, usually because a later stage aborted.
    #[error("stage '{stage}' lost its downstream queue")]
    Disconnected { stage: String },

    #[error("stage '{stage}' panicked")]
    StagePanicked { stage: String },

    /// The last stage emitted nothing. The combine stage always emits one item (the empty
    /// string for empty input), so the standard signing stages never return this.
    #[error("pipeline finished without producing a result")]
    Empty,

    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// True for the knock-on error a stage reports when its downstream went away.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, PipelineError::Disconnected { .. })
    }
}

/// Outcome of one stage run.
pub type StageResult = std::result::Result<(), PipelineError>;
