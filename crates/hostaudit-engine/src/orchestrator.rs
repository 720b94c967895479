//! Runs every domain in order, then escalates.

use chrono::{DateTime, Utc};
use hostaudit_core::{Policy, RunReport};
use tracing::{info, warn};

use crate::check::ComplianceCheck;
use crate::checks::{AuthenticationCheck, FirewallCheck, MalwareCheck, SoftwareCheck};
use crate::context::RunContext;
use crate::escalation::EscalationController;
use crate::host::Host;
use crate::runlog::RunLog;
use crate::runner;

/// How the run was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Scheduled run: persistent log, may escalate and shut down
    Normal,
    /// Operator at a terminal: stdout only, never escalates
    Interactive,
}

/// One audit of one host.
pub struct Orchestrator<'a, H: Host> {
    policy: &'a Policy,
    host: &'a H,
}

impl<'a, H: Host> Orchestrator<'a, H> {
    pub const fn new(policy: &'a Policy, host: &'a H) -> Self {
        Self { policy, host }
    }

    /// Domain checks in run order: firewall, software, malware, authentication.
    fn checks(&self) -> Vec<Box<dyn ComplianceCheck + 'a>> {
        vec![
            Box::new(FirewallCheck::new(self.host, &self.policy.firewall)),
            Box::new(SoftwareCheck::new(self.host, &self.policy.software)),
            Box::new(MalwareCheck::new(self.host, &self.policy.malware)),
            Box::new(AuthenticationCheck::new(self.host)),
        ]
    }

    /// Audit every domain, write the run to `log` and, in normal mode,
    /// update the escalation state.
    pub fn run(&self, mode: Mode, log: RunLog, now: DateTime<Utc>) -> RunReport {
        let mut ctx = RunContext::new(log);
        let mut report = RunReport::new(now);
        ctx.log.header(now, &node_name());

        for check in self.checks() {
            let domain = check.domain();
            let verdict = runner::run(check.as_ref(), &mut ctx, self.policy.max_recovery_rounds);
            info!(%domain, %verdict, "domain finished");
            ctx.log.verdict(domain, verdict);
            report.record(domain, verdict);
        }

        if report.is_compliant() {
            info!("host compliant");
        } else {
            warn!(failing = ?report.failing(), "host not compliant");
        }

        if mode == Mode::Normal {
            EscalationController::new(self.policy, self.host).update(&report, now, &mut ctx.log);
        }

        ctx.log.finish();
        report
    }
}

impl<H: Host> std::fmt::Debug for Orchestrator<'_, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Host name for the run header, `/etc/machine-id` if it has none.
fn node_name() -> String {
    if let Ok(name) = hostname::get() {
        let name = name.to_string_lossy().trim().to_string();
        if !name.is_empty() {
            return name;
        }
    }

    std::fs::read_to_string("/etc/machine-id")
        .map(|id| id.trim().to_string())
        .ok()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
