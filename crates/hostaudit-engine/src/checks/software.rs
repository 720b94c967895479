//! Software freshness: automatic upgrades are on and nothing is pending.

use hostaudit_core::config::SoftwareConfig;
use hostaudit_core::{Domain, RecoveryId};

use crate::check::{ComplianceCheck, Condition, Finding};
use crate::formats::apt;
use crate::host::PackageHost;
use crate::recovery::Recovery;

/// Conditions:
/// 1. automatic upgrades enabled (recoverable: write the periodic directives)
/// 2. no stale packages (terminal)
pub struct SoftwareCheck<'a> {
    host: &'a dyn PackageHost,
    config: &'a SoftwareConfig,
}

impl<'a> SoftwareCheck<'a> {
    pub fn new(host: &'a dyn PackageHost, config: &'a SoftwareConfig) -> Self {
        Self { host, config }
    }
}

impl ComplianceCheck for SoftwareCheck<'_> {
    fn domain(&self) -> Domain {
        Domain::Software
    }

    fn conditions(&self) -> Vec<Condition<'_>> {
        let max = self.config.max_pending_updates;
        vec![
            Condition::recoverable(
                "automatic upgrades",
                move || {
                    let finding = match self.host.auto_upgrade_config()? {
                        None => Finding::new(false, "config absent"),
                        Some(text) if apt::auto_upgrades_enabled(&text) => {
                            Finding::new(true, "enabled")
                        }
                        Some(_) => Finding::new(false, "disabled"),
                    };
                    Ok(finding)
                },
                Recovery::new(RecoveryId::EnableAutoUpgrades, move || {
                    self.host.write_auto_upgrade_config(apt::AUTO_UPGRADES)
                }),
            ),
            Condition::terminal("pending updates", move || {
                let pending = self.host.pending_updates()?;
                Ok(Finding::new(
                    pending <= max,
                    format!("{pending} pending (maximum {max})"),
                ))
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner;
    use crate::testing::{memory_context, FakeHost};
    use hostaudit_core::Verdict;

    #[test]
    fn up_to_date_host_passes() {
        let host = FakeHost::compliant();
        let config = SoftwareConfig::default();
        let (mut ctx, _out) = memory_context();

        let verdict = runner::run(&SoftwareCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(host.calls("write_auto_upgrade_config"), 0);
    }

    #[test]
    fn missing_config_is_written_then_passes() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().auto_upgrade = None;
        let config = SoftwareConfig::default();
        let (mut ctx, out) = memory_context();

        let verdict = runner::run(&SoftwareCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(ctx.guards.attempts(RecoveryId::EnableAutoUpgrades), 1);
        assert_eq!(
            host.state.borrow().auto_upgrade.as_deref(),
            Some(apt::AUTO_UPGRADES)
        );
        assert!(out
            .contents()
            .contains("[software] automatic upgrades: config absent: violated"));
    }

    #[test]
    fn disabled_directive_is_rewritten() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().auto_upgrade =
            Some("APT::Periodic::Unattended-Upgrade \"0\";\n".into());
        let config = SoftwareConfig::default();
        let (mut ctx, _out) = memory_context();

        let verdict = runner::run(&SoftwareCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(host.calls("write_auto_upgrade_config"), 1);
    }

    #[test]
    fn pending_updates_are_terminal() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().pending_updates = 3;
        let config = SoftwareConfig::default();
        let (mut ctx, out) = memory_context();

        let verdict = runner::run(&SoftwareCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Fail);
        assert_eq!(ctx.guards.total_attempts(), 0);
        assert!(out.contents().contains("3 pending (maximum 0): violated"));
    }

    #[test]
    fn tolerance_from_config() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().pending_updates = 3;
        let config = SoftwareConfig {
            max_pending_updates: 5,
            ..SoftwareConfig::default()
        };
        let (mut ctx, _out) = memory_context();

        let verdict = runner::run(&SoftwareCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Pass);
    }
}
