//! Host collaborators backed by real files and OS commands.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use hostaudit_core::{AuditError, Policy, Result};
use tracing::debug;

use super::{notice, CredentialHost, FirewallHost, MalwareHost, Notifier, PackageHost};
use crate::formats::{apt, iptables};

/// The local machine, configured by a policy.
#[derive(Debug, Clone)]
pub struct SystemHost {
    policy: Policy,
}

impl SystemHost {
    /// Bind to the paths and settings of `policy`.
    #[must_use]
    pub const fn new(policy: Policy) -> Self {
        Self { policy }
    }
}

/// Read a file, mapping "not found" to `None`.
fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AuditError::io(path, e)),
    }
}

fn read_required(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| AuditError::io(path, e))
}

/// Write a file, creating its directory first.
fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AuditError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| AuditError::io(path, e))
}

/// Run a command to completion and require a zero exit status.
fn run(command: &mut Command) -> Result<Output> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!(program = %program, "running command");

    let output = command
        .output()
        .map_err(|e| AuditError::command(&program, e.to_string()))?;

    if output.status.success() {
        Ok(output)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(AuditError::command(
            &program,
            format!("{}: {}", output.status, stderr.trim()),
        ))
    }
}

impl FirewallHost for SystemHost {
    fn rule_count(&self) -> Result<usize> {
        let output = run(Command::new("iptables").arg("-S"))?;
        Ok(iptables::count_rules(&String::from_utf8_lossy(&output.stdout)))
    }

    fn load_default_rules(&self) -> Result<()> {
        let path = &self.policy.firewall.default_rules;
        let rules = File::open(path).map_err(|e| AuditError::io(path, e))?;
        run(Command::new("iptables-restore").stdin(Stdio::from(rules)))?;
        Ok(())
    }
}

impl PackageHost for SystemHost {
    fn auto_upgrade_config(&self) -> Result<Option<String>> {
        read_optional(&self.policy.software.auto_upgrade_config)
    }

    fn write_auto_upgrade_config(&self, content: &str) -> Result<()> {
        write_file(&self.policy.software.auto_upgrade_config, content)
    }

    fn pending_updates(&self) -> Result<usize> {
        let output = run(Command::new("apt-get").args(["-s", "-q", "upgrade"]))?;
        Ok(apt::count_pending(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl MalwareHost for SystemHost {
    fn scan_schedule(&self) -> Result<Option<String>> {
        read_optional(&self.policy.malware.schedule_file)
    }

    fn install_scan_schedule(&self, content: &str) -> Result<()> {
        write_file(&self.policy.malware.schedule_file, content)
    }

    fn scanner_installed(&self) -> Result<bool> {
        Ok(self.policy.malware.scanner.is_file())
    }
}

impl CredentialHost for SystemHost {
    fn pam_password(&self) -> Result<Option<String>> {
        read_optional(&self.policy.authentication.pam_password)
    }

    fn restore_pam_password(&self) -> Result<()> {
        let auth = &self.policy.authentication;
        let template = read_required(&auth.pam_template)?;
        write_file(&auth.pam_password, &template)
    }

    fn login_defs(&self) -> Result<String> {
        read_required(&self.policy.authentication.login_defs)
    }

    fn write_login_defs(&self, content: &str) -> Result<()> {
        write_file(&self.policy.authentication.login_defs, content)
    }

    fn passwd(&self) -> Result<String> {
        read_required(&self.policy.authentication.passwd)
    }

    fn shadow(&self) -> Result<String> {
        read_required(&self.policy.authentication.shadow)
    }
}

impl Notifier for SystemHost {
    fn broadcast(&self, message: &str) -> Result<()> {
        let mut child = Command::new("wall")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AuditError::command("wall", e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(message.as_bytes())
                .map_err(|e| AuditError::command("wall", e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| AuditError::command("wall", e.to_string()))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(AuditError::command("wall", output.status.to_string()))
        }
    }

    fn install_login_notice(&self, message: &str) -> Result<()> {
        let path = &self.policy.paths.login_notice;
        let existing = read_optional(path)?.unwrap_or_default();
        write_file(path, &notice::install_block(&existing, message))
    }

    fn remove_login_notice(&self) -> Result<()> {
        let path = &self.policy.paths.login_notice;
        match read_optional(path)? {
            Some(existing) if notice::has_block(&existing) => {
                write_file(path, &notice::remove_block(&existing))
            }
            _ => Ok(()),
        }
    }

    fn schedule_shutdown(&self, delay_minutes: u32, message: &str) -> Result<()> {
        run(Command::new("shutdown")
            .arg("-h")
            .arg(format!("+{delay_minutes}"))
            .arg(message))?;
        Ok(())
    }
}
