//! Runtime configuration for template checking.
//!
//! # Config file: `.bufrcheckrc`
//!
//! TOML, looked up in two places:
//!
//! - **Global**: `~/.bufrcheckrc`
//! - **Local**: `.bufrcheckrc` in the start directory or any parent; overrides global
//!
//! ```toml
//! # .bufrcheckrc example
//! threads = 4
//! max_input_bytes = 1048576
//!
//! [output]
//! format = "json"
//! ```
//!
//! All fields are optional. Tables other than the top level (such as
//! `[output]`) belong to the command-line front end and are ignored here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".bufrcheckrc";

/// TOML-friendly intermediate representation (all fields optional).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    /// Worker threads for batch checks (0 = all cores).
    threads: Option<usize>,
    /// Largest input accepted, in bytes.
    max_input_bytes: Option<u64>,
}

/// # Defaults
///
/// | Setting | Default |
/// |---------|---------|
/// | `threads` | `0` (= use all available cores) |
/// | `max_input_bytes` | 16 MiB |
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of rayon workers for batch checks.
    /// `0` means "use all available cores" (rayon default).
    pub threads: usize,
    /// Inputs larger than this are refused before parsing.
    pub max_input_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: 0,
            max_input_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `~/.bufrcheckrc`, then the nearest local `.bufrcheckrc` at or
    /// above `start_dir`. Local values override global ones.
    pub fn load(start_dir: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::find_global_config() {
            if let Ok(global_config) = Self::from_file(&global_path) {
                config = global_config;
            }
        }

        if let Some(local_path) = Self::find_local_config(start_dir) {
            let content = std::fs::read_to_string(&local_path)
                .with_context(|| format!("Failed to read config file: {}", local_path.display()))?;
            let local: ConfigFile = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", local_path.display()))?;
            config.merge(local);
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(toml_str).context("Failed to parse config")?;
        let mut config = Self::default();
        config.merge(file);
        Ok(config)
    }

    fn merge(&mut self, file: ConfigFile) {
        if let Some(threads) = file.threads {
            self.threads = threads;
        }
        if let Some(limit) = file.max_input_bytes {
            self.max_input_bytes = limit;
        }
    }

    fn find_global_config() -> Option<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .filter(|p| p.is_file())
    }

    /// Walks up from `start_dir` looking for `.bufrcheckrc`.
    pub fn find_local_config(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
        let mut dir = start_dir.as_ref().to_path_buf();
        if let Ok(abs) = dir.canonicalize() {
            dir = abs;
        }

        loop {
            let rc_file = dir.join(CONFIG_FILE_NAME);
            if rc_file.is_file() {
                return Some(rc_file);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Builder: limit worker threads (`0` = all cores).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_max_input_bytes(mut self, limit: u64) -> Self {
        self.max_input_bytes = limit;
        self
    }
}
