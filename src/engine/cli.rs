//! CLI command handler: resolve options, run the signing pipeline, print the result.

use anyhow::{Context, Result};
use kdam::Animation;
use log::{debug, info};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::hashing::Signers;
use crate::engine::progress::{
    ProgressBarConfig, create_progress_bar, finish_bar, progress_callback,
};
use crate::engine::tools::resolve_inputs;
use crate::pipeline::{Combine, run_signing};
use crate::utils::{apply_file_to_opts, load_signer_toml, salt_from_env, setup_logging};

/// Overwrite opts field from the CLI when the flag was given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Defaults → `.signer.toml` → SIGNER_SALT / .env → CLI flags.
fn setup_opts(cli: &Cli) -> Result<Opts> {
    let cwd = std::env::current_dir().context("resolve working directory")?;
    let mut opts = Opts::default();
    if let Some(file) = load_signer_toml(&cwd)? {
        apply_file_to_opts(&file, &mut opts);
    }
    if let Some(salt) = salt_from_env(&cwd) {
        opts.salt = salt;
    }
    apply_cli_opt!(cli, opts, queue_cap => queue_cap);
    apply_cli_opt!(cli, opts, fan_out => fan_out);
    apply_cli_opt!(cli, opts, workers => workers);
    apply_cli_opt!(cli, opts, salt => salt);
    apply_cli_opt!(cli, opts, slow_digest => slow_digest);
    apply_cli_opt!(cli, opts, json => json);
    apply_cli_opt!(cli, opts, verbose => verbose);
    if let Some(ms) = cli.fast_latency_ms {
        opts.fast_latency = Duration::from_millis(ms);
    }
    if let Some(ms) = cli.slow_latency_ms {
        opts.slow_latency = Duration::from_millis(ms);
    }
    setup_logging(opts.verbose);
    Ok(opts)
}

#[derive(Serialize)]
struct RunReport<'a> {
    result: &'a str,
    items: usize,
    elapsed_ms: u128,
}

/// Run the signing pipeline over the CLI's inputs and print the combined result.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli)?;
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    let inputs = resolve_inputs(&cli.numbers, cli.input.as_deref())?;
    info!("Signing {} items", inputs.len());

    let signers = Signers::from_opts(&opts);
    let bar = opts.verbose.then(|| {
        create_progress_bar(ProgressBarConfig::new(
            inputs.len(),
            "Signing",
            Animation::Classic,
        ))
    });
    let combine = match progress_callback(&bar) {
        Some(on_item) => Combine::new().with_progress(on_item),
        None => Combine::new(),
    };

    let start = Instant::now();
    let result = run_signing(&inputs, &signers, &opts, combine).context("signing run failed")?;
    let elapsed = start.elapsed();
    if let Some(bar) = &bar {
        finish_bar(bar);
    }

    if opts.json {
        let report = RunReport {
            result: &result,
            items: inputs.len(),
            elapsed_ms: elapsed.as_millis(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", result);
    }
    Ok(())
}
