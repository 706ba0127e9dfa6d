//! Engine module: digest primitives, admission gate, CLI plumbing

pub mod arg_parser;
pub mod cli;
pub mod gate;
pub mod hashing;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use gate::{AdmissionGate, Permit};
pub use hashing::{Blake3Digest, Crc32Digest, FastDigest, Md5Digest, Signers, SlowDigest};
pub use tools::{parse_numbers, resolve_inputs};
