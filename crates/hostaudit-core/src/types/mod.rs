//! Core types for the compliance agent.

pub mod check;
pub mod domain;
pub mod report;

pub use check::{CheckResult, RecoveryId, RecoveryOutcome, Verdict};
pub use domain::Domain;
pub use report::{DomainVerdict, RunReport};
