//! # hostaudit-core
//!
//! Shared vocabulary for the hostaudit compliance agent.
//!
//! The agent audits a host against a fixed baseline made of four
//! compliance domains:
//!
//! - **Firewall** -- a rule set is loaded
//! - **Software** -- automatic upgrades are on and nothing is stale
//! - **Malware** -- a scanner is installed and scheduled
//! - **Authentication** -- PAM and credential stores use strong hashing
//!   and agree with each other
//!
//! This crate holds the types every other crate speaks: the tri-state
//! [`CheckResult`], the final [`Verdict`], the [`RunReport`], the
//! [`RecoveryId`] of each remediation, the [`AuditError`] type and the
//! TOML [`Policy`].

pub mod config;
pub mod error;
pub mod types;

pub use config::Policy;
pub use error::{AuditError, Result};
pub use types::*;
