use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

/// Module path without the crate prefix, e.g. `pipeline::executor`.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix(env!("CARGO_PKG_NAME"))
        .map(|rest| rest.trim_start_matches("::"))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(target)
}

/// Initialise the global logger: dependencies at warn, this crate at info (debug when
/// `verbose`). Stage threads log concurrently, so debug lines carry their module. Later calls
/// are no-ops.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME").cyan();
            let target = short_target(record.target());
            let line = match record.level() {
                Level::Error => format!("[{} {} {}] {}", name, "ERROR".red(), target, record.args()),
                Level::Warn => format!("[{} {} {}] {}", name, "WARN".yellow(), target, record.args()),
                Level::Info => format!("[{}] {}", name, record.args()),
                Level::Debug | Level::Trace => {
                    format!("[{} {}] {}", name, target.dimmed(), record.args())
                }
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
