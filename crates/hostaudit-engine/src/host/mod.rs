//! Host collaborators.
//!
//! Each trait is a narrow capability: inspect returns a count, a flag or
//! raw file content; install/rewrite returns success or failure. Parsing
//! and compliance decisions live in the checks, not here.

pub mod notice;
pub mod system;

pub use system::SystemHost;

use hostaudit_core::Result;

/// Packet filter inspector and loader.
pub trait FirewallHost {
    /// Number of rules currently loaded.
    fn rule_count(&self) -> Result<usize>;

    /// Load the configured default rule set.
    fn load_default_rules(&self) -> Result<()>;
}

/// Package manager inspector and auto-upgrade configuration.
pub trait PackageHost {
    /// Auto-upgrade configuration text, `None` if the file is absent.
    fn auto_upgrade_config(&self) -> Result<Option<String>>;

    /// Replace the auto-upgrade configuration.
    fn write_auto_upgrade_config(&self, content: &str) -> Result<()>;

    /// Packages with an update pending.
    fn pending_updates(&self) -> Result<usize>;
}

/// Scheduled scan inspector and installer.
pub trait MalwareHost {
    /// Scan schedule file text, `None` if absent.
    fn scan_schedule(&self) -> Result<Option<String>>;

    /// Replace the scan schedule file.
    fn install_scan_schedule(&self, content: &str) -> Result<()>;

    /// Whether the scanner binary is present.
    fn scanner_installed(&self) -> Result<bool>;
}

/// Credential store inspector and rewriter.
pub trait CredentialHost {
    /// PAM password stack text, `None` if absent.
    fn pam_password(&self) -> Result<Option<String>>;

    /// Restore the PAM password stack from its template.
    fn restore_pam_password(&self) -> Result<()>;

    /// `login.defs` text.
    fn login_defs(&self) -> Result<String>;

    /// Replace `login.defs`.
    fn write_login_defs(&self, content: &str) -> Result<()>;

    /// `passwd` text.
    fn passwd(&self) -> Result<String>;

    /// `shadow` text.
    fn shadow(&self) -> Result<String>;
}

/// User-facing escalation channels.
pub trait Notifier {
    /// Send a message to every interactive session.
    fn broadcast(&self, message: &str) -> Result<()>;

    /// Install (or replace) the login-time warning.
    fn install_login_notice(&self, message: &str) -> Result<()>;

    /// Remove the login-time warning if present.
    fn remove_login_notice(&self) -> Result<()>;

    /// Start an irreversible shutdown after `delay_minutes`.
    fn schedule_shutdown(&self, delay_minutes: u32, message: &str) -> Result<()>;
}

/// Everything the orchestrator needs from a host.
pub trait Host: FirewallHost + PackageHost + MalwareHost + CredentialHost + Notifier {}

impl<T> Host for T where T: FirewallHost + PackageHost + MalwareHost + CredentialHost + Notifier {}
