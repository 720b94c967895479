//! Parsers for the host files and command output the checks inspect.
//!
//! Each parser builds a small structured model so checks validate
//! semantics (required directives, schemes, user sets) rather than
//! comparing text.

pub mod accounts;
pub mod apt;
pub mod cron;
pub mod iptables;
pub mod login_defs;
pub mod pam;
