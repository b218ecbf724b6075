use anyhow::{Context, Result};
use bufrcheck_validate::config::{CONFIG_FILE_NAME, Config as CheckConfig};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// The `[output]` table of `.bufrcheckrc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub colored: bool,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub quiet: bool,

    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            colored: true,
            verbose: false,
            quiet: false,
            format: OutputFormat::Text,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RcFile {
    #[serde(default)]
    output: Option<OutputConfig>,
}

fn default_true() -> bool {
    true
}

const DEFAULT_RC: &str = r#"# bufrcheck configuration file

# Worker threads for checking several files (0 = all cores)
threads = 0

# Inputs larger than this many bytes are refused
max_input_bytes = 16777216

[output]
# Enable colored output in terminal
colored = true

# Log progress to stderr
verbose = false

# Only set the exit status, print nothing on success or failure
quiet = false

# "text" or "json"
format = "text"
"#;

impl OutputConfig {
    /// Loads `[output]` from the nearest local `.bufrcheckrc`, falling back
    /// to `~/.bufrcheckrc`, then to defaults.
    pub fn load(start_dir: &Path) -> Result<Self> {
        let path = CheckConfig::find_local_config(start_dir).or_else(global_rc);

        match path {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let rc: RcFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(rc.output.unwrap_or_default())
    }

    /// Writes a commented `.bufrcheckrc` with every setting at its default.
    pub fn create_default(path: &Path) -> Result<()> {
        fs::write(path, DEFAULT_RC).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Command-line flags win over the file.
    pub fn merge_cli_args(&mut self, no_color: bool, verbose: bool, quiet: bool, format: Option<OutputFormat>) {
        if no_color {
            self.colored = false;
        }

        if verbose {
            self.verbose = true;
        }

        if quiet {
            self.quiet = true;
        }

        if let Some(format) = format {
            self.format = format;
        }
    }
}

fn global_rc() -> Option<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .filter(|p| p.is_file())
}
