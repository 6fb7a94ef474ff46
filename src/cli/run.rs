//! Command execution for the CLI.
//!
//! This module handles running CLI commands and producing output.

use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::logbook::Logbook;
use crate::paths;
use crate::storage::SqliteLogbook;
use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

impl CliOutput {
    fn success(stdout: Vec<String>, stderr: Vec<String>) -> Self {
        Self { exit_code: ExitCode::SUCCESS, stdout, stderr }
    }

    fn failure(message: String) -> Self {
        Self { exit_code: ExitCode::from(1), stdout: vec![], stderr: vec![message] }
    }
}

/// Run a CLI command.
pub fn run(cli: &Cli) -> CliOutput {
    run_at(cli, chrono::Utc::now().timestamp())
}

/// Run a CLI command as if the current time were `now` (unix seconds).
pub fn run_at(cli: &Cli, now: i64) -> CliOutput {
    match &cli.command {
        Command::Version => run_version(),
        Command::Sync { since, .. } => run_sync(cli, *since, now),
        Command::Reset => run_reset(cli),
        Command::Settings => run_settings(cli),
    }
}

fn run_version() -> CliOutput {
    CliOutput::success(vec![], vec![format!("omnifocus-logbook v{}", crate::VERSION)])
}

fn settings_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.settings {
        Some(path) => Ok(path.clone()),
        None => paths::settings_path()
            .ok_or_else(|| Error::Config("Cannot determine home directory".into())),
    }
}

fn database_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    match &cli.database {
        Some(path) => paths::expand_home(path)
            .ok_or_else(|| Error::Config("Cannot determine home directory".into())),
        None => settings.resolve_database_path(),
    }
}

/// Render an error with its source chain on one line.
fn describe(err: &Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn run_sync(cli: &Cli, since: Option<i64>, now: i64) -> CliOutput {
    match sync(cli, since, now) {
        Ok(output) => output,
        Err(e) => CliOutput::failure(format!("Error: {}", describe(&e))),
    }
}

fn sync(cli: &Cli, since: Option<i64>, now: i64) -> Result<CliOutput> {
    let settings_path = settings_path(cli)?;
    let mut settings = Settings::load_from(&settings_path)?;
    let db_path = database_path(cli, &settings)?;
    let latest_sync_time = since.unwrap_or(settings.latest_sync_time);

    tracing::debug!(db = %db_path.display(), latest_sync_time, "starting sync");
    let logbook = Logbook::new(SqliteLogbook::new(db_path));
    let tasks = logbook.sync(latest_sync_time)?;
    let json = serde_json::to_string_pretty(&tasks)?;

    let mut messages = vec![format!("Fetched {} completed tasks", tasks.len())];
    if cli.command.writes_settings() {
        settings.record_sync(now);
        settings.save_to(&settings_path)?;
        messages.push(format!("Recorded sync time {now}"));
    }

    Ok(CliOutput::success(vec![json], messages))
}

fn run_reset(cli: &Cli) -> CliOutput {
    let result = settings_path(cli).and_then(|path| {
        let mut settings = Settings::load_from(&path)?;
        settings.reset_sync_history();
        settings.save_to(&path)
    });
    match result {
        Ok(()) => CliOutput::success(vec![], vec!["Sync history reset".to_string()]),
        Err(e) => CliOutput::failure(format!("Error resetting sync history: {}", describe(&e))),
    }
}

fn run_settings(cli: &Cli) -> CliOutput {
    let result = settings_path(cli)
        .and_then(|path| Settings::load_from(&path))
        .and_then(|settings| serde_yaml::to_string(&settings).map_err(Error::from));
    match result {
        Ok(yaml) => CliOutput::success(vec![yaml], vec![]),
        Err(e) => CliOutput::failure(format!("Error loading settings: {}", describe(&e))),
    }
}
