//! Diagnostics setup.
//!
//! Interactive runs log to stderr. Unattended runs must never write to a
//! terminal, so their diagnostics are appended, uncolored, to the run log
//! file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use hostaudit_engine::Mode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the diagnostics filter.
pub const LOG_ENV: &str = "HOSTAUDIT_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber for `mode`.
pub fn init(mode: Mode, log_file: &Path) -> Result<()> {
    let registry = tracing_subscriber::registry().with(filter());

    let installed = match mode {
        Mode::Interactive => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
        Mode::Normal => {
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .with_context(|| format!("opening {}", log_file.display()))?;
            registry
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
    };

    installed.context("installing tracing subscriber")
}
