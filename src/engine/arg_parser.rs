use clap::Parser;
use std::path::PathBuf;

use crate::SlowDigestKind;

/// Concurrent composite-hash pipeline with deterministic merge.
#[derive(Clone, Parser)]
#[command(name = "signer")]
#[command(
    about = "Sign integers through SingleHash → MultiHash → Combine and print the merged result."
)]
pub struct Cli {
    /// Integers to sign. Default: the built-in sample when neither NUMBERS nor --input is given.
    #[arg(value_name = "NUMBERS", allow_negative_numbers = true)]
    pub numbers: Vec<i64>,

    /// Read integers from FILE, one per line (blank lines and `#` comments skipped).
    #[arg(long, short = 'i', value_name = "FILE", conflicts_with = "numbers")]
    pub input: Option<PathBuf>,

    /// Capacity of every inter-stage queue.
    #[arg(long, short = 'q', value_parser = clap::value_parser!(usize))]
    pub queue_cap: Option<usize>,

    /// Parallel sub-digests per item in the multi-hash stage.
    #[arg(long, short = 'k', value_parser = clap::value_parser!(usize))]
    pub fan_out: Option<usize>,

    /// Items each hashing stage works on at once.
    #[arg(long, short = 'w', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Simulated latency of each fast digest call, in milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub fast_latency_ms: Option<u64>,

    /// Simulated latency of each slow digest call, in milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub slow_latency_ms: Option<u64>,

    /// Salt appended to every digest input (or use SIGNER_SALT / .env).
    #[arg(long, short = 's')]
    pub salt: Option<String>,

    /// Primitive behind the slow digest.
    #[arg(long, value_enum)]
    pub slow_digest: Option<SlowDigestKind>,

    /// Print a JSON report instead of the bare result.
    #[arg(long, short = 'j', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub json: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
