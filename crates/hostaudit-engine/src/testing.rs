//! Shared test doubles.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use hostaudit_core::config::MalwareConfig;
use hostaudit_core::{AuditError, Result};

use crate::context::RunContext;
use crate::formats::{apt, cron};
use crate::host::{CredentialHost, FirewallHost, MalwareHost, Notifier, PackageHost};
use crate::runlog::RunLog;

/// In-memory writer whose contents stay readable after the log takes it.
#[derive(Debug, Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A run context logging into memory.
pub fn memory_context() -> (RunContext, SharedBuf) {
    let buf = SharedBuf::default();
    (RunContext::new(RunLog::from_writer(buf.clone())), buf)
}

pub const PAM_STRONG: &str = "password [success=1 default=ignore] pam_unix.so obscure sha512\n\
password requisite pam_deny.so\n\
password required pam_permit.so\n";

pub const PASSWD: &str = "root:x:0:0:root:/root:/bin/bash\n\
alice:x:1000:1000:Alice:/home/alice:/bin/bash\n";

pub const SHADOW: &str = "root:*:19000:0:99999:7:::\n\
alice:$6$salt$hash:19500:0:99999:7:::\n";

/// Observable host state.
#[derive(Debug, Clone)]
pub struct FakeState {
    pub rule_count: usize,
    pub auto_upgrade: Option<String>,
    pub pending_updates: usize,
    pub schedule: Option<String>,
    pub scanner_installed: bool,
    pub pam: Option<String>,
    pub pam_template: String,
    pub login_defs: String,
    pub passwd: String,
    pub shadow: String,
    pub fail_probes: bool,
    pub fail_mutations: bool,
    pub fail_notifier: bool,
    pub login_notice: Option<String>,
    pub broadcasts: Vec<String>,
    pub shutdowns: Vec<(u32, String)>,
}

/// Host double whose mutations change what later probes observe.
#[derive(Debug)]
pub struct FakeHost {
    pub state: RefCell<FakeState>,
    calls: RefCell<BTreeMap<&'static str, u32>>,
}

impl FakeHost {
    /// A host that satisfies every default-policy condition.
    pub fn compliant() -> Self {
        let malware = MalwareConfig::default();
        let state = FakeState {
            rule_count: 12,
            auto_upgrade: Some(apt::AUTO_UPGRADES.to_string()),
            pending_updates: 0,
            schedule: Some(cron::scan_job(
                &malware.schedule,
                &malware.scanner,
                &malware.scan_root,
            )),
            scanner_installed: true,
            pam: Some(PAM_STRONG.to_string()),
            pam_template: PAM_STRONG.to_string(),
            login_defs: "UMASK 022\nENCRYPT_METHOD SHA512\n".to_string(),
            passwd: PASSWD.to_string(),
            shadow: SHADOW.to_string(),
            fail_probes: false,
            fail_mutations: false,
            fail_notifier: false,
            login_notice: None,
            broadcasts: Vec::new(),
            shutdowns: Vec::new(),
        };
        Self {
            state: RefCell::new(state),
            calls: RefCell::new(BTreeMap::new()),
        }
    }

    /// How often a trait method was called.
    pub fn calls(&self, method: &str) -> u32 {
        self.calls.borrow().get(method).copied().unwrap_or(0)
    }

    fn record(&self, method: &'static str) {
        *self.calls.borrow_mut().entry(method).or_insert(0) += 1;
    }

    fn probe<T>(&self, method: &'static str, read: impl FnOnce(&FakeState) -> T) -> Result<T> {
        self.record(method);
        let state = self.state.borrow();
        if state.fail_probes {
            return Err(AuditError::command(method, "probe unavailable"));
        }
        Ok(read(&state))
    }

    fn mutate(&self, method: &'static str, write: impl FnOnce(&mut FakeState)) -> Result<()> {
        self.record(method);
        let mut state = self.state.borrow_mut();
        if state.fail_mutations {
            return Err(AuditError::io(
                Path::new("/fake"),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ));
        }
        write(&mut state);
        Ok(())
    }

    fn notify(&self, method: &'static str, write: impl FnOnce(&mut FakeState)) -> Result<()> {
        self.record(method);
        let mut state = self.state.borrow_mut();
        if state.fail_notifier {
            return Err(AuditError::command(method, "no terminal"));
        }
        write(&mut state);
        Ok(())
    }
}

impl FirewallHost for FakeHost {
    fn rule_count(&self) -> Result<usize> {
        self.probe("rule_count", |s| s.rule_count)
    }

    fn load_default_rules(&self) -> Result<()> {
        self.mutate("load_default_rules", |s| s.rule_count = 5)
    }
}

impl PackageHost for FakeHost {
    fn auto_upgrade_config(&self) -> Result<Option<String>> {
        self.probe("auto_upgrade_config", |s| s.auto_upgrade.clone())
    }

    fn write_auto_upgrade_config(&self, content: &str) -> Result<()> {
        self.mutate("write_auto_upgrade_config", |s| {
            s.auto_upgrade = Some(content.to_string());
        })
    }

    fn pending_updates(&self) -> Result<usize> {
        self.probe("pending_updates", |s| s.pending_updates)
    }
}

impl MalwareHost for FakeHost {
    fn scan_schedule(&self) -> Result<Option<String>> {
        self.probe("scan_schedule", |s| s.schedule.clone())
    }

    fn install_scan_schedule(&self, content: &str) -> Result<()> {
        self.mutate("install_scan_schedule", |s| {
            s.schedule = Some(content.to_string());
        })
    }

    fn scanner_installed(&self) -> Result<bool> {
        self.probe("scanner_installed", |s| s.scanner_installed)
    }
}

impl CredentialHost for FakeHost {
    fn pam_password(&self) -> Result<Option<String>> {
        self.probe("pam_password", |s| s.pam.clone())
    }

    fn restore_pam_password(&self) -> Result<()> {
        self.mutate("restore_pam_password", |s| s.pam = Some(s.pam_template.clone()))
    }

    fn login_defs(&self) -> Result<String> {
        self.probe("login_defs", |s| s.login_defs.clone())
    }

    fn write_login_defs(&self, content: &str) -> Result<()> {
        self.mutate("write_login_defs", |s| s.login_defs = content.to_string())
    }

    fn passwd(&self) -> Result<String> {
        self.probe("passwd", |s| s.passwd.clone())
    }

    fn shadow(&self) -> Result<String> {
        self.probe("shadow", |s| s.shadow.clone())
    }
}

impl Notifier for FakeHost {
    fn broadcast(&self, message: &str) -> Result<()> {
        self.notify("broadcast", |s| s.broadcasts.push(message.to_string()))
    }

    fn install_login_notice(&self, message: &str) -> Result<()> {
        self.notify("install_login_notice", |s| {
            s.login_notice = Some(message.to_string());
        })
    }

    fn remove_login_notice(&self) -> Result<()> {
        self.notify("remove_login_notice", |s| s.login_notice = None)
    }

    fn schedule_shutdown(&self, delay_minutes: u32, message: &str) -> Result<()> {
        self.notify("schedule_shutdown", |s| {
            s.shutdowns.push((delay_minutes, message.to_string()));
        })
    }
}
