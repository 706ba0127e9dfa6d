//! Digest primitives: the fast checksum and the serialized slow digest.

use md5::Digest as _;
use md5::Md5;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::engine::gate::{AdmissionGate, Permit};
use crate::error::SignerError;
use crate::{Opts, SlowDigestKind};

/// Cheap digest, safe to call from any number of threads at once.
pub trait FastDigest: Send + Sync {
    fn digest(&self, data: &str) -> Result<String, SignerError>;
}

/// Expensive digest that tolerates only one call in flight at a time.
///
/// The [`Permit`] argument proves the caller holds the [`AdmissionGate`]; implementations never
/// acquire the gate themselves. The gate lives in [`Signers`], so calls are serialized per
/// pipeline (every clone of one `Signers`). Two independent `Signers` sharing one digest
/// instance are not serialized against each other.
pub trait SlowDigest: Send + Sync {
    fn digest(&self, permit: &Permit<'_>, data: &str) -> Result<String, SignerError>;
}

impl<F> FastDigest for F
where
    F: Fn(&str) -> Result<String, SignerError> + Send + Sync,
{
    fn digest(&self, data: &str) -> Result<String, SignerError> {
        self(data)
    }
}

impl<F> SlowDigest for F
where
    F: Fn(&str) -> Result<String, SignerError> + Send + Sync,
{
    fn digest(&self, _permit: &Permit<'_>, data: &str) -> Result<String, SignerError> {
        self(data)
    }
}

fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        thread::sleep(latency);
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// CRC-32 (IEEE) of `data + salt`, rendered as an unsigned decimal.
#[derive(Clone, Debug, Default)]
pub struct Crc32Digest {
    salt: String,
    latency: Duration,
}

impl Crc32Digest {
    pub fn new(salt: impl Into<String>, latency: Duration) -> Self {
        Self {
            salt: salt.into(),
            latency,
        }
    }
}

impl FastDigest for Crc32Digest {
    fn digest(&self, data: &str) -> Result<String, SignerError> {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(data.as_bytes());
        hasher.update(self.salt.as_bytes());
        let sum = hasher.finalize();
        simulate_latency(self.latency);
        Ok(sum.to_string())
    }
}

/// Marks a digest as busy for the lifetime of the guard.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    /// Fails with [`SignerError::Overheat`] when another call is already inside the digest.
    fn enter(flag: &'a AtomicBool, digest: &'static str) -> Result<Self, SignerError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SignerError::Overheat { digest })?;
        Ok(InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// MD5 of `data + salt`, lowercase hex. Detects overlapping calls.
#[derive(Debug, Default)]
pub struct Md5Digest {
    salt: String,
    latency: Duration,
    in_flight: AtomicBool,
}

impl Md5Digest {
    pub fn new(salt: impl Into<String>, latency: Duration) -> Self {
        Self {
            salt: salt.into(),
            latency,
            in_flight: AtomicBool::new(false),
        }
    }
}

impl SlowDigest for Md5Digest {
    fn digest(&self, _permit: &Permit<'_>, data: &str) -> Result<String, SignerError> {
        let _busy = InFlight::enter(&self.in_flight, "md5")?;
        let mut hasher = Md5::new();
        hasher.update(data.as_bytes());
        hasher.update(self.salt.as_bytes());
        let sum = hasher.finalize();
        simulate_latency(self.latency);
        Ok(to_hex(&sum))
    }
}

/// BLAKE3 of `data + salt`, lowercase hex. Detects overlapping calls.
#[derive(Debug, Default)]
pub struct Blake3Digest {
    salt: String,
    latency: Duration,
    in_flight: AtomicBool,
}

impl Blake3Digest {
    pub fn new(salt: impl Into<String>, latency: Duration) -> Self {
        Self {
            salt: salt.into(),
            latency,
            in_flight: AtomicBool::new(false),
        }
    }
}

impl SlowDigest for Blake3Digest {
    fn digest(&self, _permit: &Permit<'_>, data: &str) -> Result<String, SignerError> {
        let _busy = InFlight::enter(&self.in_flight, "blake3")?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(data.as_bytes());
        hasher.update(self.salt.as_bytes());
        let sum = hasher.finalize();
        simulate_latency(self.latency);
        Ok(sum.to_hex().to_string())
    }
}

/// The digest pair a pipeline runs with, plus the gate that serializes the slow one.
///
/// Clones share the same gate, so every stage built from one `Signers` respects the same
/// single-flight constraint.
#[derive(Clone)]
pub struct Signers {
    pub fast: Arc<dyn FastDigest>,
    pub slow: Arc<dyn SlowDigest>,
    pub gate: Arc<AdmissionGate>,
}

impl Signers {
    pub fn new(fast: Arc<dyn FastDigest>, slow: Arc<dyn SlowDigest>) -> Self {
        Self {
            fast,
            slow,
            gate: Arc::new(AdmissionGate::new()),
        }
    }

    /// Default primitives: CRC-32 for the fast digest, MD5 or BLAKE3 for the slow one.
    pub fn from_opts(opts: &Opts) -> Self {
        let fast: Arc<dyn FastDigest> = Arc::new(Crc32Digest::new(&*opts.salt, opts.fast_latency));
        let slow: Arc<dyn SlowDigest> = match opts.slow_digest {
            SlowDigestKind::Md5 => Arc::new(Md5Digest::new(&*opts.salt, opts.slow_latency)),
            SlowDigestKind::Blake3 => Arc::new(Blake3Digest::new(&*opts.salt, opts.slow_latency)),
        };
        Self::new(fast, slow)
    }

    /// Run the slow digest under the gate.
    pub fn slow_digest(&self, data: &str) -> Result<String, SignerError> {
        let permit = self.gate.admit();
        self.slow.digest(&permit, data)
    }
}
