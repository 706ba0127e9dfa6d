//! Signer: concurrent composite-hash pipeline with deterministic merge

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::{PipelineError, SignerError};
pub use pipeline::{Combine, FnStage, Stage, execute_pipeline, run_pipeline};
pub use types::*;

use engine::hashing::Signers;
use log::debug;

/// Result alias used by public signer API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: sign `inputs` with the default primitives and return the combined string.
///
/// Each input goes through SingleHash then MultiHash; the results are sorted and joined with `_`.
/// Any primitive failure aborts the run; the returned error downcasts to [`PipelineError`].
pub fn sign(inputs: &[i64], opts: &SignOpts) -> Result<String> {
    let opts = Opts::from(opts);
    let signers = Signers::from_opts(&opts);
    sign_opts(inputs, &signers, &opts)
}

/// Same as [`sign`] with caller-supplied primitives (e.g. test doubles or other hashes).
pub fn sign_with(inputs: &[i64], signers: &Signers, opts: &SignOpts) -> Result<String> {
    sign_opts(inputs, signers, &Opts::from(opts))
}

fn sign_opts(inputs: &[i64], signers: &Signers, opts: &Opts) -> Result<String> {
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    debug!("{}", config_str);
    Ok(pipeline::run_signing(
        inputs,
        signers,
        opts,
        Combine::new(),
    )?)
}
