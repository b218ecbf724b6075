//! Reading template text into memory.
//!
//! This is the only fallible step of a check. Failures are returned as
//! `anyhow` errors, never as diagnostics.

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Path that selects standard input.
pub const STDIN_PATH: &str = "-";

/// A template fully buffered in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub name: String,
    pub text: String,
}

impl Input {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }
}

/// Reads `path` (or stdin for `-`) into memory, refusing anything larger
/// than `max_bytes`. The handle is closed before this returns.
pub fn read_input(path: &Path, max_bytes: u64) -> Result<Input> {
    if path.as_os_str() == STDIN_PATH {
        let text = read_bounded(io::stdin().lock(), max_bytes).context("Failed to read template from stdin")?;
        return Ok(Input::new("<stdin>", text));
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let text = read_bounded(file, max_bytes).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Input::new(path.display().to_string(), text))
}

fn read_bounded(reader: impl Read, max_bytes: u64) -> Result<String> {
    let mut text = String::new();
    reader.take(max_bytes.saturating_add(1)).read_to_string(&mut text)?;

    if text.len() as u64 > max_bytes {
        bail!("input exceeds the {} byte limit", max_bytes);
    }
    Ok(text)
}
