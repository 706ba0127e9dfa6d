use log::{debug, info};
use std::time::Instant;

use crate::engine::hashing::Signers;
use crate::error::PipelineError;
use crate::{Item, Opts, Stage};

use super::combine::Combine;
use super::executor::run_pipeline;
use super::multi_hash::MultiHash;
use super::single_hash::SingleHash;

/// The standard signing pipeline: SingleHash → MultiHash → Combine.
pub fn signing_stages(signers: &Signers, opts: &Opts, combine: Combine) -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(SingleHash::new(signers).with_workers(opts.workers)),
        Box::new(MultiHash::new(signers, opts.fan_out).with_workers(opts.workers)),
        Box::new(combine),
    ]
}

/// Main orchestrator: feed `inputs` through the signing pipeline and return the combined string.
/// Input → single_hash → multi_hash → combine → one result.
pub fn run_signing(
    inputs: &[i64],
    signers: &Signers,
    opts: &Opts,
    combine: Combine,
) -> Result<String, PipelineError> {
    opts.validate()?;
    let stages = signing_stages(signers, opts, combine);
    let items: Vec<Item> = inputs.iter().copied().map(Item::Number).collect();

    let start = Instant::now();
    let mut drained = run_pipeline(items, &stages, opts.queue_cap)?;
    let result = drained
        .pop()
        .map(Item::into_text)
        .ok_or(PipelineError::Empty)?;
    info!("Signed {} items in {:?}", inputs.len(), start.elapsed());
    debug!("result: {} chars", result.len());
    Ok(result)
}
