//! Firewall: a rule set is loaded.

use hostaudit_core::config::FirewallConfig;
use hostaudit_core::{Domain, RecoveryId};

use crate::check::{ComplianceCheck, Condition, Finding};
use crate::host::FirewallHost;
use crate::recovery::Recovery;

/// Conditions:
/// 1. rules loaded (recoverable: restore the default rule set)
pub struct FirewallCheck<'a> {
    host: &'a dyn FirewallHost,
    config: &'a FirewallConfig,
}

impl<'a> FirewallCheck<'a> {
    /// Check `host` against `config`.
    pub fn new(host: &'a dyn FirewallHost, config: &'a FirewallConfig) -> Self {
        Self { host, config }
    }
}

impl ComplianceCheck for FirewallCheck<'_> {
    fn domain(&self) -> Domain {
        Domain::Firewall
    }

    fn conditions(&self) -> Vec<Condition<'_>> {
        let min = self.config.min_rules;
        vec![Condition::recoverable(
            "rules loaded",
            move || {
                let count = self.host.rule_count()?;
                Ok(Finding::new(
                    count >= min,
                    format!("rule count {count} (minimum {min})"),
                ))
            },
            Recovery::new(RecoveryId::LoadFirewallRules, move || {
                self.host.load_default_rules()
            }),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner;
    use crate::testing::{memory_context, FakeHost};
    use hostaudit_core::Verdict;

    #[test]
    fn rules_present_pass_without_recovery() {
        let host = FakeHost::compliant();
        let config = FirewallConfig::default();
        let (mut ctx, _out) = memory_context();

        let verdict = runner::run(&FirewallCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(ctx.guards.total_attempts(), 0);
        assert_eq!(host.calls("load_default_rules"), 0);
    }

    #[test]
    fn empty_ruleset_is_loaded_then_passes() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().rule_count = 0;
        let config = FirewallConfig::default();
        let (mut ctx, out) = memory_context();

        let verdict = runner::run(&FirewallCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(host.calls("load_default_rules"), 1);
        assert_eq!(ctx.guards.attempts(RecoveryId::LoadFirewallRules), 1);
        let log = out.contents();
        assert!(log.contains("[firewall] rules loaded: rule count 0 (minimum 1): violated"));
        assert!(log.contains("[firewall] recovery load-firewall-rules: applied"));
    }

    #[test]
    fn loader_failure_is_fail() {
        let host = FakeHost::compliant();
        {
            let mut state = host.state.borrow_mut();
            state.rule_count = 0;
            state.fail_mutations = true;
        }
        let config = FirewallConfig::default();
        let (mut ctx, _out) = memory_context();

        let verdict = runner::run(&FirewallCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Fail);
    }

    #[test]
    fn inspector_failure_is_fail() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().fail_probes = true;
        let config = FirewallConfig::default();
        let (mut ctx, _out) = memory_context();

        let verdict = runner::run(&FirewallCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Fail);
        assert_eq!(host.calls("load_default_rules"), 0);
    }
}
