//! # bufrcheck-validate
//!
//! Structural checks on parsed BUFR descriptor templates and the per-input
//! [`Report`] that pairs them with syntax diagnostics.
//!
//! ```rust
//! use bufrcheck_validate::check_source;
//!
//! let report = check_source("102003 001001");
//!
//! assert!(!report.has_syntax_errors());
//! assert_eq!(report.iteration_messages(), Some(vec!["expected 2, got 1"]));
//! ```
//!
//! - [`replication`]: replication-span validator
//! - [`report`]: the two-channel result record
//! - [`source`]: reading inputs into memory
//! - [`batch`]: parallel checks over many inputs
//! - [`config`]: `.bufrcheckrc` loading

pub mod batch;
pub mod config;
pub mod replication;
pub mod report;
pub mod source;

pub use batch::Batch;
pub use config::Config;
pub use replication::{ContextState, IterationError, ReplicationValidator, validate};
pub use report::Report;
pub use source::{Input, read_input};

use anyhow::Result;
use bufrcheck_syntax::{SyntaxDiagnostics, parse_source};
use std::path::Path;

/// Parses and validates one template held in memory.
pub fn check_source(source: &str) -> Report {
    let mut sink = SyntaxDiagnostics::new();
    let template = parse_source(source, &mut sink);
    let iteration = validate(&template);
    Report::new(sink.into_vec(), iteration)
}

/// Reads `path` and checks it. Only reading can fail.
pub fn check_file(path: &Path, config: &Config) -> Result<Report> {
    let input = read_input(path, config.max_input_bytes)?;
    Ok(check_source(&input.text).with_name(input.name))
}
