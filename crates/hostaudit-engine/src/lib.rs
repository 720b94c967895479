//! # hostaudit-engine
//!
//! Drives every compliance domain through a bounded check/recover/re-check
//! cycle, then escalates if the host stays non-compliant.
//!
//! ## Data Flow
//!
//! ```text
//! Orchestrator::run()
//!   for domain in [firewall, software, malware, authentication]:
//!     runner::run(check)
//!       check() -> Pass | Fail | Recovered
//!         first violated condition:
//!           recoverable -> Recovery::apply() (one shot per invocation)
//!           terminal    -> Fail
//!       Recovered -> check() again, bounded
//!     -> Verdict (Pass | Fail | Unknown)
//!   -> RunReport
//!   EscalationController::update(report)   (normal mode only)
//!     marker file: first-failure-anchored deadline
//!     login notice + broadcast, shutdown once the deadline passes
//! ```
//!
//! All host interaction goes through the traits in [`host`]; the
//! [`host::SystemHost`] implementation talks to real files and commands.

pub mod check;
pub mod checks;
pub mod context;
pub mod escalation;
pub mod formats;
pub mod host;
pub mod orchestrator;
pub mod recovery;
pub mod runlog;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use check::{ComplianceCheck, Condition, Finding};
pub use context::RunContext;
pub use escalation::{EscalationController, EscalationOutcome, MarkerStore};
pub use orchestrator::{Mode, Orchestrator};
pub use recovery::{GuardSet, Recovery};
pub use runlog::RunLog;
