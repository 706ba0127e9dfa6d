//! Public and internal types for the signer API and pipeline.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::error::PipelineError;
use crate::utils::config::{MultiHashConsts, QueueConsts, SignerLatency, WorkerConsts};

/// A value flowing through the pipeline. Numbers at ingestion, text after the first stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Number(i64),
    Text(String),
}

impl Item {
    /// Text form of the item; numbers are rendered in decimal.
    pub fn into_text(self) -> String {
        match self {
            Item::Number(n) => n.to_string(),
            Item::Text(s) => s,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Number(n) => write!(f, "{}", n),
            Item::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Item {
    fn from(n: i64) -> Self {
        Item::Number(n)
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Item::Text(s)
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::Text(s.to_string())
    }
}

/// Which primitive backs the slow (serialized) digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SlowDigestKind {
    /// MD5, lowercase hex.
    #[default]
    Md5,
    /// BLAKE3, lowercase hex.
    Blake3,
}

/// Lib-only options for [`sign`](crate::sign). Only the fields that shape the pipeline itself.
#[derive(Clone, Debug)]
pub struct SignOpts {
    /// Capacity shared by every inter-stage queue.
    pub queue_cap: usize,
    /// Number of parallel sub-digests per item in the multi-hash stage.
    pub fan_out: usize,
    /// Items each hashing stage works on at once.
    pub workers: usize,
    /// Simulated latency added to every fast digest call.
    pub fast_latency: Duration,
    /// Simulated latency added to every slow digest call.
    pub slow_latency: Duration,
    /// Appended to every digest input before hashing.
    pub salt: String,
    /// Primitive behind the slow digest.
    pub slow_digest: SlowDigestKind,
}

impl Default for SignOpts {
    fn default() -> Self {
        Self {
            queue_cap: QueueConsts::DEFAULT_CAPACITY,
            fan_out: MultiHashConsts::DEFAULT_FAN_OUT,
            workers: WorkerConsts::DEFAULT_WORKERS,
            fast_latency: Duration::from_millis(SignerLatency::FAST_MS),
            slow_latency: Duration::from_millis(SignerLatency::SLOW_MS),
            salt: String::new(),
            slow_digest: SlowDigestKind::default(),
        }
    }
}

impl From<&SignOpts> for Opts {
    fn from(o: &SignOpts) -> Self {
        Opts {
            queue_cap: o.queue_cap,
            fan_out: o.fan_out,
            workers: o.workers,
            fast_latency: o.fast_latency,
            slow_latency: o.slow_latency,
            salt: o.salt.clone(),
            slow_digest: o.slow_digest,
            verbose: false,
            json: false,
        }
    }
}

/// Full options (CLI). Use [`SignOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Capacity shared by every inter-stage queue.
    pub queue_cap: usize,
    /// Number of parallel sub-digests per item in the multi-hash stage.
    pub fan_out: usize,
    /// Items each hashing stage works on at once.
    pub workers: usize,
    /// Simulated latency added to every fast digest call.
    pub fast_latency: Duration,
    /// Simulated latency added to every slow digest call.
    pub slow_latency: Duration,
    /// Appended to every digest input before hashing.
    pub salt: String,
    /// Primitive behind the slow digest.
    pub slow_digest: SlowDigestKind,
    /// Debug logging and progress bar.
    pub verbose: bool,
    /// Print a JSON report instead of the bare result.
    pub json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Opts::from(&SignOpts::default())
    }
}

impl Opts {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.queue_cap == 0 {
            return Err(PipelineError::InvalidConfig(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        if self.fan_out == 0 {
            return Err(PipelineError::InvalidConfig(
                "fan-out factor must be at least 1".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(PipelineError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
