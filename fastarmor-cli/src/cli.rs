//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's
//! derive macros. It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Fastarmor -- anonymous PKINIT FAST verification harness.
///
/// Use `fastarmor <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "fastarmor", version, about, long_about = None)]
pub struct Cli {
    /// Path to the fastarmor.toml configuration file.
    #[arg(short, long, default_value = "fastarmor.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run verification scenarios against the target host.
    Run(RunArgs),

    /// List the built-in scenarios.
    List(ListArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- run ----

/// Run verification scenarios.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scenario name to run (repeatable; default: all, or [run] scenarios
    /// from the config file).
    #[arg(short, long = "scenario")]
    pub scenario: Vec<String>,
}

// ---- list ----

/// List the built-in scenario table.
#[derive(Args, Debug)]
pub struct ListArgs {}

// ---- config ----

/// Manage fastarmor configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, target, principal, sssd, run).
        #[arg(long)]
        section: Option<String>,
    },
}
