//! Input helpers

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::utils::config::DEFAULT_SAMPLE;

/// Parse one integer per line. Blank lines and lines starting with `#` are skipped.
pub fn parse_numbers(text: &str) -> Result<Vec<i64>> {
    let mut numbers = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let n = line
            .parse::<i64>()
            .with_context(|| format!("line {}: not an integer: {:?}", idx + 1, line))?;
        numbers.push(n);
    }
    Ok(numbers)
}

/// Pick the run's inputs: explicit numbers, else the contents of `input`, else the default sample.
pub fn resolve_inputs(numbers: &[i64], input: Option<&Path>) -> Result<Vec<i64>> {
    if !numbers.is_empty() {
        return Ok(numbers.to_vec());
    }
    match input {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read input file {}", path.display()))?;
            let numbers = parse_numbers(&text)
                .with_context(|| format!("parse input file {}", path.display()))?;
            if numbers.is_empty() {
                bail!("input file {} contains no integers", path.display());
            }
            Ok(numbers)
        }
        None => Ok(DEFAULT_SAMPLE.to_vec()),
    }
}
