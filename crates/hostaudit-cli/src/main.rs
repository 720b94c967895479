//! hostaudit - host compliance audit
//!
//! Meant to be started by a scheduler; `hostaudit -i` runs it by hand.

use std::process::ExitCode;

use anyhow::Result;

fn main() -> Result<ExitCode> {
    hostaudit_cli::run(std::env::args_os())
}
