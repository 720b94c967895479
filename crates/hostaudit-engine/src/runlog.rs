//! Append-only run log.
//!
//! One header line per run, one line per check line item or verdict, and a
//! blank separator line when the run finishes:
//!
//! ```text
//! ==== hostaudit run 2026-10-19T03:30:00Z on ws-042 ====
//! [firewall] rules loaded: rule count 0 (minimum 1): violated
//! [firewall] recovery load-firewall-rules: applied
//! [firewall] rules loaded: rule count 14 (minimum 1): ok
//! firewall: PASS
//! ...
//!
//! ```

use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::{IsTerminal, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use hostaudit_core::{AuditError, Domain, Result, Verdict};
use tracing::warn;

/// Line-oriented sink for run output.
pub struct RunLog {
    sink: Box<dyn Write>,
    color: bool,
}

impl RunLog {
    /// Open `path` for appending, creating it and its directory if needed.
    pub fn append(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AuditError::io(parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AuditError::io(path, e))?;

        Ok(Self {
            sink: Box::new(file),
            color: false,
        })
    }

    /// Write to standard output, coloring verdicts only on a terminal.
    #[must_use]
    pub fn stdout() -> Self {
        let stdout = std::io::stdout();
        Self {
            color: stdout.is_terminal(),
            sink: Box::new(stdout),
        }
    }

    /// Write to an arbitrary sink, uncolored.
    pub fn from_writer(writer: impl Write + 'static) -> Self {
        Self {
            sink: Box::new(writer),
            color: false,
        }
    }

    /// Run header with timestamp and node name.
    pub fn header(&mut self, started_at: DateTime<Utc>, node: &str) {
        let stamp = started_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        self.write_line(&format!("==== hostaudit run {stamp} on {node} ===="));
    }

    /// A check line item for one domain.
    pub fn item(&mut self, domain: Domain, text: impl Display) {
        self.write_line(&format!("[{domain}] {text}"));
    }

    /// Final verdict line for one domain.
    pub fn verdict(&mut self, domain: Domain, verdict: Verdict) {
        let line = if self.color {
            let label = match verdict {
                Verdict::Pass => verdict.to_string().green().bold(),
                Verdict::Fail => verdict.to_string().red().bold(),
                Verdict::Unknown => verdict.to_string().yellow().bold(),
            };
            format!("{}: {label}", domain.name().bold())
        } else {
            format!("{domain}: {verdict}")
        };
        self.write_line(&line);
    }

    /// Free-form line not tied to a domain.
    pub fn note(&mut self, text: impl Display) {
        self.write_line(&text.to_string());
    }

    /// Close the run with the blank separator line.
    pub fn finish(&mut self) {
        self.write_line("");
        if let Err(e) = self.sink.flush() {
            warn!(error = %e, "run log flush failed");
        }
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.sink, "{line}") {
            warn!(error = %e, "run log write failed");
        }
    }
}

impl std::fmt::Debug for RunLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLog")
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}
