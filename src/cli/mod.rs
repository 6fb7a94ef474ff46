//! Command-line interface for omnifocus-logbook.
//!
//! This module provides the command definitions. Execution lives in
//! [`run`] so that the binary stays a thin wrapper and every command is
//! testable without spawning a process.

mod run;


pub use run::{run, run_at, CliOutput};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Import completed OmniFocus tasks into a logbook.
///
/// Reads the OmniFocus `SQLite` cache (read-only), picks up every task
/// completed or dropped since the last sync, and prints them as JSON.
#[derive(Parser, Debug)]
#[command(name = "omnifocus-logbook")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file (default: ~/.omnifocus-logbook/settings.yaml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// OmniFocus database file (overrides the settings file)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Log pagination progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch tasks completed since the last sync and print them as JSON.
    ///
    /// On success the sync time is advanced, unless `--since` or
    /// `--dry-run` is given. A failed sync leaves it unchanged so the
    /// next run starts from the same point.
    Sync {
        /// Sync from this unix timestamp instead of the last sync time
        #[arg(long)]
        since: Option<i64>,

        /// Do not record the sync time
        #[arg(long)]
        dry_run: bool,
    },

    /// Reset sync history so the next sync re-imports everything.
    Reset,

    /// Print the effective settings as YAML.
    Settings,

    /// Show version information.
    Version,
}

impl Command {
    /// Returns true if this command may modify the settings file.
    #[must_use]
    pub const fn writes_settings(&self) -> bool {
        match self {
            Self::Sync { since, dry_run } => since.is_none() && !*dry_run,
            Self::Reset => true,
            Self::Settings | Self::Version => false,
        }
    }
}
