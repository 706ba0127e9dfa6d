//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
    salt_env_key: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
                salt_env_key: format!("{}_SALT", pkg.to_uppercase()),
            }
        })
    }

    /// Per-directory config file, e.g. `.signer.toml`.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Env var holding the digest salt, e.g. `SIGNER_SALT`.
    pub fn salt_env_key(&self) -> &str {
        &self.salt_env_key
    }
}

// ---- Queues ----

/// Inter-stage queue sizing.
pub struct QueueConsts;

impl QueueConsts {
    /// Capacity shared by every inter-stage queue.
    pub const DEFAULT_CAPACITY: usize = 100;
}

// ---- Workers ----

/// Per-stage worker pool sizing.
pub struct WorkerConsts;

impl WorkerConsts {
    /// Items each hashing stage works on at once. Matches the queue capacity so a full queue
    /// can drain in one latency round.
    pub const DEFAULT_WORKERS: usize = 100;
}

// ---- Multi-hash ----

pub struct MultiHashConsts;

impl MultiHashConsts {
    /// Sub-digests per item; slot `k` hashes `k` prepended to the item.
    pub const DEFAULT_FAN_OUT: usize = 6;
}

// ---- Digest latency ----

/// Simulated cost of each primitive call (milliseconds).
pub struct SignerLatency;

impl SignerLatency {
    pub const FAST_MS: u64 = 1000;
    pub const SLOW_MS: u64 = 10;
}

// ---- Output formatting ----

/// Between `fast(raw)` and `fast(slow(raw))` in the single-hash result.
pub const SINGLE_HASH_SEPARATOR: &str = "~";

/// Between sorted results in the combined output.
pub const COMBINE_SEPARATOR: &str = "_";

/// Inputs used when none are given on the command line.
pub const DEFAULT_SAMPLE: [i64; 7] = [0, 1, 1, 2, 3, 5, 8];
