//! # hostaudit-cli
//!
//! The `hostaudit` binary: audits the host against its baseline policy,
//! repairs what it can once, and escalates towards a shutdown if the host
//! stays non-compliant past the grace period.
//!
//! ## Modes
//!
//! - **normal** (no arguments): run log and diagnostics are appended to the
//!   log file, escalation is active
//! - **interactive** (`-i`): everything goes to the terminal, no escalation

pub mod cli;
pub mod logging;

pub use cli::run;
