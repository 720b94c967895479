//! Argument handling and the audit run.

pub mod args;

use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::{Context, Result};
use args::Cli;
use clap::{CommandFactory, Parser};
use hostaudit_core::Policy;
use hostaudit_engine::host::SystemHost;
use hostaudit_engine::{Mode, Orchestrator, RunLog};
use tracing::info;

use crate::logging;

/// Run the CLI application.
///
/// Unusable arguments print the usage and succeed. Otherwise the exit code
/// is 0 for a compliant host and 1 for anything else.
pub fn run<I, T>(args: I) -> Result<ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let Ok(cli) = Cli::try_parse_from(args) else {
        print!("{}", Cli::command().render_help());
        return Ok(ExitCode::SUCCESS);
    };
    let mode = cli.mode();

    let config_path = Policy::path();
    let policy = Policy::load(&config_path)
        .with_context(|| format!("loading policy from {}", config_path.display()))?;

    logging::init(mode, &policy.paths.log_file)?;
    info!(?mode, config = %config_path.display(), "starting audit");

    let log = match mode {
        Mode::Normal => RunLog::append(&policy.paths.log_file).with_context(|| {
            format!("opening run log {}", policy.paths.log_file.display())
        })?,
        Mode::Interactive => RunLog::stdout(),
    };

    let host = SystemHost::new(policy.clone());
    let report = Orchestrator::new(&policy, &host).run(mode, log, chrono::Utc::now());

    Ok(if report.is_compliant() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
