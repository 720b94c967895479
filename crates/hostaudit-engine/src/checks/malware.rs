//! Anti-malware: a periodic scan is scheduled and the scanner exists.

use hostaudit_core::config::MalwareConfig;
use hostaudit_core::{Domain, RecoveryId};

use crate::check::{ComplianceCheck, Condition, Finding};
use crate::formats::cron;
use crate::host::MalwareHost;
use crate::recovery::Recovery;

/// Conditions:
/// 1. scan scheduled (recoverable: install the cron job)
/// 2. scanner installed (terminal)
pub struct MalwareCheck<'a> {
    host: &'a dyn MalwareHost,
    config: &'a MalwareConfig,
}

impl<'a> MalwareCheck<'a> {
    pub fn new(host: &'a dyn MalwareHost, config: &'a MalwareConfig) -> Self {
        Self { host, config }
    }
}

impl ComplianceCheck for MalwareCheck<'_> {
    fn domain(&self) -> Domain {
        Domain::Malware
    }

    fn conditions(&self) -> Vec<Condition<'_>> {
        let config = self.config;
        vec![
            Condition::recoverable(
                "scan scheduled",
                move || {
                    let Some(text) = self.host.scan_schedule()? else {
                        return Ok(Finding::new(false, "schedule absent"));
                    };
                    let jobs = cron::parse(&text)
                        .into_iter()
                        .filter(|job| job.invokes(&config.scanner))
                        .count();
                    Ok(Finding::new(
                        jobs > 0,
                        format!("{jobs} job(s) run {}", config.scanner.display()),
                    ))
                },
                Recovery::new(RecoveryId::ScheduleMalwareScan, move || {
                    let job = cron::scan_job(&config.schedule, &config.scanner, &config.scan_root);
                    self.host.install_scan_schedule(&job)
                }),
            ),
            Condition::terminal("scanner installed", move || {
                let installed = self.host.scanner_installed()?;
                let state = if installed { "present" } else { "missing" };
                Ok(Finding::new(
                    installed,
                    format!("{} {state}", config.scanner.display()),
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
    use std::path::Path;

    #[test]
    fn scheduled_scan_passes() {
        let host = FakeHost::compliant();
        let config = MalwareConfig::default();
        let (mut ctx, _out) = memory_context();

        let verdict = runner::run(&MalwareCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(host.calls("install_scan_schedule"), 0);
    }

    #[test]
    fn absent_schedule_is_installed() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().schedule = None;
        let config = MalwareConfig::default();
        let (mut ctx, _out) = memory_context();

        let verdict = runner::run(&MalwareCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(ctx.guards.attempts(RecoveryId::ScheduleMalwareScan), 1);

        let installed = host.state.borrow().schedule.clone().unwrap();
        let jobs = cron::parse(&installed);
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].invokes(Path::new("/usr/bin/clamscan")));
        assert_eq!(jobs[0].schedule.join(" "), config.schedule);
    }

    #[test]
    fn commented_out_job_counts_as_absent() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().schedule =
            Some("# 30 3 * * * root /usr/bin/clamscan -r /home\n".into());
        let config = MalwareConfig::default();
        let (mut ctx, out) = memory_context();

        let verdict = runner::run(&MalwareCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Pass);
        assert!(out.contents().contains("scan scheduled: 0 job(s)"));
    }

    #[test]
    fn missing_scanner_fails_without_recovery() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().scanner_installed = false;
        let config = MalwareConfig::default();
        let (mut ctx, out) = memory_context();

        let verdict = runner::run(&MalwareCheck::new(&host, &config), &mut ctx, 8);
        assert_eq!(verdict, Verdict::Fail);
        assert_eq!(ctx.guards.total_attempts(), 0);
        assert!(out
            .contents()
            .contains("[malware] scanner installed: no automatic recovery"));
    }
}
