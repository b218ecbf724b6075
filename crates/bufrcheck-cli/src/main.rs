//! # bufrcheck-cli
//!
//! Command-line front end for the BUFR descriptor template checker.
//!
//! Reads templates from files (or stdin for `-`), runs the parser and the
//! replication validator over each, and prints the two diagnostic channels.
//! The exit status is `0` when every input is clean, `1` when any input has
//! diagnostics and `2` when an input or the configuration could not be read.

mod config;
mod errors;
mod output;

use anyhow::{Context, Result};
use bufrcheck_syntax::{SyntaxDiagnostics, parse_source, tokenize};
use bufrcheck_validate::config::CONFIG_FILE_NAME;
use bufrcheck_validate::{Batch, Config as CheckConfig, Input, read_input};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tracing::{Level, debug};

use config::{OutputConfig, OutputFormat};
use errors::{EnhancedError, enhance_error};

const EXIT_DIAGNOSTICS: i32 = 1;
const EXIT_ACQUISITION: i32 = 2;

#[derive(Parser)]
#[command(name = "bufrcheck")]
#[command(about = "Syntax and replication checker for BUFR descriptor templates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log progress to stderr (repeat for more detail)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Check templates and report syntax and iteration errors")]
    Check {
        /// Template files, or '-' for stdin
        #[arg(value_name = "FILE", default_value = "-")]
        files: Vec<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Worker threads (0 = all cores)
        #[arg(short = 'j', long)]
        jobs: Option<usize>,
        /// Print nothing, only set the exit status
        #[arg(short, long)]
        quiet: bool,
    },
    #[command(about = "Print the token stream of a template")]
    Tokens {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    #[command(about = "Print the parsed replication tree of a template")]
    Tree {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    #[command(about = "Show the effective configuration")]
    Config {
        /// Write a default .bufrcheckrc in the current directory
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let (mut settings, check_config) = match load_configs(&cwd) {
        Ok(configs) => configs,
        Err(e) => {
            enhance_error(&e)
                .with_help(format!("Fix or remove the {} file", CONFIG_FILE_NAME))
                .display();
            std::process::exit(EXIT_ACQUISITION);
        }
    };

    let (format, quiet) = match &cli.command {
        Commands::Check { format, quiet, .. } => (*format, *quiet),
        _ => (None, false),
    };
    settings.merge_cli_args(cli.no_color, cli.verbose > 0, quiet, format);

    init_tracing(cli.verbose, settings.verbose);
    if !settings.colored {
        colored::control::set_override(false);
    }

    let code = match cli.command {
        Commands::Check { files, jobs, .. } => {
            let check_config = match jobs {
                Some(jobs) => check_config.with_threads(jobs),
                None => check_config,
            };
            run_check(&files, &check_config, &settings)?
        }
        Commands::Tokens { file } => show_tokens(&file, &check_config),
        Commands::Tree { file } => show_tree(&file, &check_config),
        Commands::Config { init } => handle_config(&cwd, init, &check_config, &settings)?,
    };

    std::process::exit(code);
}

fn load_configs(cwd: &Path) -> Result<(OutputConfig, CheckConfig)> {
    let settings = OutputConfig::load(cwd)?;
    let check = CheckConfig::load(cwd)?;
    Ok((settings, check))
}

fn init_tracing(count: u8, config_verbose: bool) {
    let level = match count {
        0 if config_verbose => Level::INFO,
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads and checks every file on the batch workers. Any read failure is
/// reported and turns the whole run into an acquisition failure.
fn run_check(files: &[PathBuf], config: &CheckConfig, settings: &OutputConfig) -> Result<i32> {
    let results = Batch::new(config.threads).check_paths(files, config.max_input_bytes)?;

    let mut inputs = Vec::with_capacity(results.len());
    let mut reports = Vec::with_capacity(results.len());
    let mut failed = false;
    for result in results {
        match result {
            Ok((input, report)) => {
                inputs.push(input);
                reports.push(report);
            }
            Err(e) => {
                enhance_error(&e).display();
                failed = true;
            }
        }
    }
    if failed {
        return Ok(EXIT_ACQUISITION);
    }

    let clean = reports.iter().all(|r| r.is_clean());
    debug!(inputs = inputs.len(), clean, "check finished");

    if !settings.quiet {
        match settings.format {
            OutputFormat::Text => print!("{}", output::render_text(&inputs, &reports)),
            OutputFormat::Json => println!("{}", output::render_json(&reports)?),
        }
    }

    Ok(if clean { 0 } else { EXIT_DIAGNOSTICS })
}

fn read_one(file: &Path, config: &CheckConfig) -> Option<Input> {
    match read_input(file, config.max_input_bytes) {
        Ok(input) => Some(input),
        Err(e) => {
            enhance_error(&e).display();
            None
        }
    }
}

fn show_tokens(file: &Path, config: &CheckConfig) -> i32 {
    let Some(input) = read_one(file, config) else {
        return EXIT_ACQUISITION;
    };
    print!("{}", output::render_tokens(&tokenize(&input.text)));
    0
}

fn show_tree(file: &Path, config: &CheckConfig) -> i32 {
    let Some(input) = read_one(file, config) else {
        return EXIT_ACQUISITION;
    };

    let mut sink = SyntaxDiagnostics::new();
    let template = parse_source(&input.text, &mut sink);
    print!("{}", output::render_tree(&template, sink.diagnostics()));

    if sink.is_empty() { 0 } else { EXIT_DIAGNOSTICS }
}

fn handle_config(cwd: &Path, init: bool, check: &CheckConfig, settings: &OutputConfig) -> Result<i32> {
    if init {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            EnhancedError::new(format!("{} already exists", path.display()))
                .with_help("Edit the existing file or remove it first")
                .display();
            return Ok(EXIT_DIAGNOSTICS);
        }
        OutputConfig::create_default(&path)?;
        println!("{} Created {}", "✓".green().bold(), path.display());
        return Ok(0);
    }

    match CheckConfig::find_local_config(cwd) {
        Some(path) => println!("{} {}", "Local config:".bold(), path.display()),
        None => println!("{} {}", "Local config:".bold(), "(none)".dimmed()),
    }
    if let Some(home) = dirs::home_dir() {
        let global = home.join(CONFIG_FILE_NAME);
        if global.is_file() {
            println!("{} {}", "Global config:".bold(), global.display());
        }
    }
    println!();

    println!("  {} = {}", "threads".cyan(), check.threads);
    println!("  {} = {}", "max_input_bytes".cyan(), check.max_input_bytes);
    println!("  {} = {}", "output.colored".cyan(), settings.colored);
    println!("  {} = {}", "output.verbose".cyan(), settings.verbose);
    println!("  {} = {}", "output.quiet".cyan(), settings.quiet);
    println!("  {} = {}", "output.format".cyan(), settings.format);

    Ok(0)
}
