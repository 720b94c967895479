//! The tri-state compliance check protocol.
//!
//! A check lists its domain's conditions in a fixed order, recoverable ones
//! first and terminal ones last, and walks them until the first violation:
//!
//! - violated with a recovery: apply it, `Recovered` on `Ok`, else `Fail`
//! - violated without a recovery: `Fail`
//! - a probe that errors: `Fail` (the collaborator itself is broken)
//!
//! No violation means `Pass`.

use hostaudit_core::{CheckResult, Domain, RecoveryOutcome, Result};
use tracing::{debug, warn};

use crate::context::RunContext;
use crate::recovery::Recovery;

/// What a probe observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Whether the condition holds
    pub holds: bool,
    /// Observed value for the run log
    pub detail: String,
}

impl Finding {
    /// Build a finding from an observation.
    pub fn new(holds: bool, detail: impl Into<String>) -> Self {
        Self {
            holds,
            detail: detail.into(),
        }
    }
}

type Probe<'a> = Box<dyn Fn() -> Result<Finding> + 'a>;

/// One required condition of a domain.
pub struct Condition<'a> {
    name: &'static str,
    probe: Probe<'a>,
    recovery: Option<Recovery<'a>>,
}

impl<'a> Condition<'a> {
    /// A condition with a one-shot remediation.
    pub fn recoverable(
        name: &'static str,
        probe: impl Fn() -> Result<Finding> + 'a,
        recovery: Recovery<'a>,
    ) -> Self {
        Self {
            name,
            probe: Box::new(probe),
            recovery: Some(recovery),
        }
    }

    /// A structural condition nothing can fix automatically.
    pub fn terminal(name: &'static str, probe: impl Fn() -> Result<Finding> + 'a) -> Self {
        Self {
            name,
            probe: Box::new(probe),
            recovery: None,
        }
    }

    /// Condition name as logged.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether a remediation exists.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        self.recovery.is_some()
    }
}

impl std::fmt::Debug for Condition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Condition")
            .field("name", &self.name)
            .field("recovery", &self.recovery)
            .finish_non_exhaustive()
    }
}

/// A compliance domain's read-only probe.
pub trait ComplianceCheck {
    /// Domain this check audits.
    fn domain(&self) -> Domain;

    /// Required conditions, recoverable first, terminal last.
    fn conditions(&self) -> Vec<Condition<'_>>;

    /// Number of conditions; bounds the runner's rounds.
    fn condition_count(&self) -> usize {
        self.conditions().len()
    }

    /// One check pass.
    fn check(&self, ctx: &mut RunContext) -> CheckResult {
        evaluate(self.domain(), &self.conditions(), ctx)
    }
}

/// Walk `conditions` in order and stop at the first violation.
pub fn evaluate(domain: Domain, conditions: &[Condition<'_>], ctx: &mut RunContext) -> CheckResult {
    for condition in conditions {
        let name = condition.name();
        let finding = match (condition.probe)() {
            Ok(finding) => finding,
            Err(e) => {
                warn!(%domain, condition = name, error = %e, "probe failed");
                ctx.log.item(domain, format_args!("{name}: probe failed: {e}"));
                return CheckResult::Fail;
            }
        };

        debug!(%domain, condition = name, holds = finding.holds, detail = %finding.detail);

        if finding.holds {
            ctx.log
                .item(domain, format_args!("{name}: {}: ok", finding.detail));
            continue;
        }

        ctx.log
            .item(domain, format_args!("{name}: {}: violated", finding.detail));

        let Some(recovery) = &condition.recovery else {
            ctx.log
                .item(domain, format_args!("{name}: no automatic recovery"));
            return CheckResult::Fail;
        };

        debug!(%domain, condition = name, recovery = %recovery.id(), "attempting recovery");
        return match recovery.apply(ctx) {
            RecoveryOutcome::Ok => CheckResult::Recovered,
            RecoveryOutcome::AlreadyAttempted | RecoveryOutcome::Failed => CheckResult::Fail,
        };
    }

    CheckResult::Pass
}
