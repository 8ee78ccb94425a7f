//! # conjure-cli
//!
//! Command-line companion to the `conjure` macros: shows what a directive
//! expands to without running the compiler.
//!
//! ## Installation
//!
//! ```bash
//! cargo install conjure-cli
//! ```
//!
//! ## Commands
//!
//! - `conjure init` - Write a default conjure.toml
//! - `conjure encode <literal>` - Encode a literal the way `obfuscate!` does
//! - `conjure expand <file>` - Print the expansion of every directive in a file
//! - `conjure config validate` - Check conjure.toml
//!
//! See `conjure --help` for the full command reference.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod ui;

#[derive(Parser)]
#[command(name = "conjure")]
#[command(about = "Conjure CLI - Inspect compile-time directive expansions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to conjure.toml configuration file
    #[arg(short, long, global = true, default_value = "conjure.toml", env = "CONJURE_CONFIG")]
    config: String,

    /// Output as JSON (machine-readable format)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    verbose: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default conjure.toml
    Init,

    /// Encode a string literal the way `obfuscate!` would
    Encode {
        /// The literal to encode
        literal: String,

        /// Encoding mode (bytes, reversed, base64, xor, bit_shift)
        #[arg(short, long)]
        mode: Option<String>,

        /// Seed for reproducible keys (overrides encode.seed)
        #[arg(long)]
        seed: Option<String>,

        /// Print the stored bytes as hex
        #[arg(long)]
        hex: bool,
    },

    /// Expand every directive in a Rust source file
    Expand {
        /// Rust source file to scan
        file: PathBuf,

        /// Seed for reproducible keys (overrides encode.seed)
        #[arg(long)]
        seed: Option<String>,
    },

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Validate conjure.toml
    Validate,
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "conjure", &mut io::stdout());
        return;
    }

    init_logging(cli.verbose, cli.json);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
        process::exit(1);
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .init();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Init => commands::config::init(&cli.config),
        Commands::Encode {
            literal,
            mode,
            seed,
            hex,
        } => commands::encode::run(
            &cli.config,
            commands::encode::EncodeOptions {
                literal: &literal,
                mode: mode.as_deref(),
                seed: seed.as_deref(),
                hex,
                json: cli.json,
            },
        ),
        Commands::Expand { file, seed } => {
            commands::expand::run(&cli.config, &file, seed.as_deref(), cli.json)
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Validate => commands::config::validate(&cli.config),
        },
    }
}
