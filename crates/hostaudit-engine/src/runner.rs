//! Domain runner: drives a check to a final verdict.
//!
//! Each recovery guard lets its action succeed at most once per
//! invocation, so a check can return `Recovered` at most once per
//! recoverable condition before the repeated violation degrades to `Fail`.
//! The runner still caps the rounds at `conditions + 1` (and at the
//! policy's `max_recovery_rounds`) and reports `Unknown` if a check has
//! not settled by then.

use hostaudit_core::{CheckResult, Verdict};
use tracing::{debug, warn};

use crate::check::ComplianceCheck;
use crate::context::RunContext;

/// Round bound for a check: one round per condition plus the final re-check.
#[must_use]
pub fn round_bound(check: &dyn ComplianceCheck, max_rounds: u32) -> u32 {
    let natural = u32::try_from(check.condition_count())
        .unwrap_or(u32::MAX)
        .saturating_add(1);
    natural.min(max_rounds.max(1))
}

/// Run the check/recover cycle for one domain.
pub fn run(check: &dyn ComplianceCheck, ctx: &mut RunContext, max_rounds: u32) -> Verdict {
    let domain = check.domain();
    let bound = round_bound(check, max_rounds);

    for round in 1..=bound {
        match check.check(ctx) {
            CheckResult::Pass => return Verdict::Pass,
            CheckResult::Fail => return Verdict::Fail,
            CheckResult::Recovered => {
                debug!(%domain, round, bound, "recovered, re-checking");
            }
        }
    }

    warn!(%domain, bound, "check did not settle");
    ctx.log
        .item(domain, format_args!("did not settle after {bound} rounds"));
    Verdict::Unknown
}
