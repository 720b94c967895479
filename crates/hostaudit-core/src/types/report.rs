//! Run report -- the per-invocation outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::check::Verdict;
use super::domain::Domain;

/// Final verdict for one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainVerdict {
    /// Domain that was audited
    pub domain: Domain,
    /// Its settled verdict
    pub verdict: Verdict,
}

/// Ordered domain verdicts plus the overall status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Verdicts in run order
    pub verdicts: Vec<DomainVerdict>,
}

impl RunReport {
    /// Start an empty report.
    #[must_use]
    pub const fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            verdicts: Vec::new(),
        }
    }

    /// Record a domain verdict.
    pub fn record(&mut self, domain: Domain, verdict: Verdict) {
        self.verdicts.push(DomainVerdict { domain, verdict });
    }

    /// Verdict for one domain, if it ran.
    #[must_use]
    pub fn verdict(&self, domain: Domain) -> Option<Verdict> {
        self.verdicts
            .iter()
            .find(|v| v.domain == domain)
            .map(|v| v.verdict)
    }

    /// Overall status: compliant only if every domain passed.
    ///
    /// `Fail` and `Unknown` both count as non-compliant.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.verdicts.iter().all(|v| v.verdict.is_pass())
    }

    /// Domains that did not pass, in run order.
    #[must_use]
    pub fn failing(&self) -> Vec<Domain> {
        self.verdicts
            .iter()
            .filter(|v| !v.verdict.is_pass())
            .map(|v| v.domain)
            .collect()
    }

    /// Process exit code for the invoking scheduler.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.is_compliant())
    }
}
