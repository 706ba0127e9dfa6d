//! Load `.signer.toml` from a directory (CLI only). Lib callers pass `SignOpts` directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::utils::config::PackagePaths;
use crate::{Opts, SlowDigestKind};

#[derive(Debug, Default, Deserialize)]
pub struct SignerToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    queue_cap: Option<usize>,
    fan_out: Option<usize>,
    workers: Option<usize>,
    fast_latency_ms: Option<u64>,
    slow_latency_ms: Option<u64>,
    salt: Option<String>,
    slow_digest: Option<SlowDigestKind>,
    verbose: Option<bool>,
    json: Option<bool>,
}

/// Parse config file contents.
pub fn parse_signer_toml(s: &str) -> Result<SignerToml> {
    Ok(toml::from_str(s)?)
}

/// Load the config file from `dir`. `Ok(None)` when there is none; a malformed file is an error.
pub fn load_signer_toml(dir: &Path) -> Result<Option<SignerToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let file = parse_signer_toml(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(file))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $idx_field:ident => $opts_field:ident) => {
        if let Some(v) = $idx.$idx_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
pub fn apply_file_to_opts(file: &SignerToml, opts: &mut Opts) {
    let set = &file.settings;
    apply_file_opt!(set, opts, queue_cap => queue_cap);
    apply_file_opt!(set, opts, fan_out => fan_out);
    apply_file_opt!(set, opts, workers => workers);
    apply_file_opt!(set, opts, salt => salt);
    apply_file_opt!(set, opts, slow_digest => slow_digest);
    apply_file_opt!(set, opts, verbose => verbose);
    apply_file_opt!(set, opts, json => json);
    if let Some(ms) = set.fast_latency_ms {
        opts.fast_latency = Duration::from_millis(ms);
    }
    if let Some(ms) = set.slow_latency_ms {
        opts.slow_latency = Duration::from_millis(ms);
    }
}
