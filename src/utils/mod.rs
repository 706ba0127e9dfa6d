pub mod config;
pub mod logger;
pub mod salt;
pub mod signer_toml;

pub use config::*;
pub use logger::setup_logging;
pub use salt::salt_from_env;
pub use signer_toml::{SignerToml, apply_file_to_opts, load_signer_toml, parse_signer_toml};
