//! Salt lookup: env var → .env in dir.

use log::info;
use std::path::Path;

use crate::utils::config::PackagePaths;

fn non_empty_var(key: &str) -> Option<String> {
    let s = std::env::var(key).ok()?;
    let s = s.trim().to_string();
    (!s.is_empty()).then_some(s)
}

fn try_env_then_dotenv(dir: &Path) -> Option<String> {
    let key = PackagePaths::get().salt_env_key();
    if let Some(s) = non_empty_var(key) {
        return Some(s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        return non_empty_var(key);
    }
    None
}

/// Read the digest salt: env (SIGNER_SALT) → .env in `dir`. None when unset or blank.
pub fn salt_from_env(dir: &Path) -> Option<String> {
    let salt = try_env_then_dotenv(dir)?;
    info!("Salt found in environment");
    Some(salt)
}
