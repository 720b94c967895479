//! Escalation: grace period, warnings and shutdown.
//!
//! State machine over {Compliant, Escalating}, persisted as the marker
//! file's presence:
//!
//! - a failing run with no marker starts the countdown at `now + grace`
//! - a failing run with a marker keeps its deadline, re-installs the login
//!   notice and broadcasts; past the deadline it schedules a shutdown
//! - a passing run deletes the marker and the login notice
//!
//! In server mode the deadline is still tracked but nothing is shown to
//! users and no shutdown is ever scheduled.

mod marker;

pub use marker::MarkerStore;

use std::fmt;

use chrono::{DateTime, Duration, Local, SecondsFormat, Utc};
use hostaudit_core::{Domain, Policy, RunReport};
use tracing::{error, info, warn};

use crate::host::Notifier;
use crate::runlog::RunLog;

/// Result of one escalation update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationOutcome {
    /// Compliant and nothing was pending
    Compliant,
    /// Compliance restored; marker and notice removed
    Cleared,
    /// Non-compliant, deadline not reached
    Pending { deadline: DateTime<Utc> },
    /// Non-compliant past the deadline; shutdown requested
    ShutdownScheduled { deadline: DateTime<Utc> },
    /// Server mode: deadline tracked, no user-facing action
    Informational { deadline: DateTime<Utc> },
}

impl fmt::Display for EscalationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compliant => write!(f, "escalation: none"),
            Self::Cleared => write!(f, "escalation: cleared"),
            Self::Pending { deadline } => {
                write!(f, "escalation: pending, deadline {}", stamp(*deadline))
            }
            Self::ShutdownScheduled { deadline } => write!(
                f,
                "escalation: deadline {} passed, shutdown scheduled",
                stamp(*deadline)
            ),
            Self::Informational { deadline } => write!(
                f,
                "escalation: server mode, deadline {} (informational)",
                stamp(*deadline)
            ),
        }
    }
}

fn stamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Tracks the non-compliance deadline and drives the notifier.
pub struct EscalationController<'a> {
    notifier: &'a dyn Notifier,
    marker: MarkerStore,
    grace: Duration,
    shutdown_delay_minutes: u32,
    server_mode: bool,
}

impl<'a> EscalationController<'a> {
    pub fn new(policy: &Policy, notifier: &'a dyn Notifier) -> Self {
        Self {
            notifier,
            marker: MarkerStore::new(&policy.paths.marker_file),
            grace: policy.grace_period(),
            shutdown_delay_minutes: policy.shutdown_delay_minutes,
            server_mode: policy.server_mode,
        }
    }

    /// Apply one run's aggregate verdict.
    ///
    /// Bookkeeping errors are logged and never turn into a different
    /// outcome for the run itself.
    pub fn update(&self, report: &RunReport, now: DateTime<Utc>, log: &mut RunLog) -> EscalationOutcome {
        let outcome = if report.is_compliant() {
            self.clear(log)
        } else {
            self.escalate(&report.failing(), now, log)
        };
        log.note(outcome);
        outcome
    }

    fn clear(&self, log: &mut RunLog) -> EscalationOutcome {
        // The notice may outlive a marker that could never be written.
        if !self.server_mode {
            if let Err(e) = self.notifier.remove_login_notice() {
                error!(error = %e, "could not remove login notice");
                log.note(format_args!("escalation: could not remove login notice: {e}"));
            }
        }

        if !self.marker.exists() {
            return EscalationOutcome::Compliant;
        }

        info!(marker = %self.marker.path().display(), "compliance restored");
        if let Err(e) = self.marker.clear() {
            error!(error = %e, "could not remove escalation marker");
            log.note(format_args!("escalation: could not remove marker: {e}"));
        }
        EscalationOutcome::Cleared
    }

    fn escalate(&self, failing: &[Domain], now: DateTime<Utc>, log: &mut RunLog) -> EscalationOutcome {
        let deadline = self.deadline(now, log);

        if self.server_mode {
            return EscalationOutcome::Informational { deadline };
        }

        let message = warning(failing, deadline);
        if let Err(e) = self.notifier.install_login_notice(&message) {
            error!(error = %e, "could not install login notice");
            log.note(format_args!("escalation: could not install login notice: {e}"));
        }
        if let Err(e) = self.notifier.broadcast(&message) {
            error!(error = %e, "broadcast failed");
            log.note(format_args!("escalation: broadcast failed: {e}"));
        }

        if now < deadline {
            return EscalationOutcome::Pending { deadline };
        }

        warn!(deadline = %deadline, delay = self.shutdown_delay_minutes, "grace period over, scheduling shutdown");
        let shutdown = format!(
            "hostaudit: grace period expired, shutting down in {} minutes",
            self.shutdown_delay_minutes
        );
        if let Err(e) = self
            .notifier
            .schedule_shutdown(self.shutdown_delay_minutes, &shutdown)
        {
            error!(error = %e, "could not schedule shutdown");
            log.note(format_args!("escalation: could not schedule shutdown: {e}"));
        }
        EscalationOutcome::ShutdownScheduled { deadline }
    }

    /// Existing deadline, or a fresh one anchored at this first failure.
    fn deadline(&self, now: DateTime<Utc>, log: &mut RunLog) -> DateTime<Utc> {
        match self.marker.read() {
            Ok(Some(deadline)) => return deadline,
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "escalation marker unreadable, starting a new countdown");
                log.note(format_args!("escalation: marker replaced: {e}"));
            }
        }

        let deadline = now + self.grace;
        info!(deadline = %deadline, "non-compliant, starting countdown");
        if let Err(e) = self.marker.write(deadline) {
            error!(error = %e, "could not write escalation marker");
            log.note(format_args!("escalation: could not write marker: {e}"));
        }
        deadline
    }
}

impl fmt::Debug for EscalationController<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EscalationController")
            .field("marker", &self.marker)
            .field("grace", &self.grace)
            .field("server_mode", &self.server_mode)
            .finish_non_exhaustive()
    }
}

fn warning(failing: &[Domain], deadline: DateTime<Utc>) -> String {
    let domains: Vec<&str> = failing.iter().map(|d| d.name()).collect();
    format!(
        "WARNING: this host does not meet the security baseline ({}).\n\
         It will be shut down after {} unless it is brought back into compliance.",
        domains.join(", "),
        stamp(deadline)
    )
}
