//! Policy configuration for a hostaudit run.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AuditError, Result};

/// Environment variable that overrides the policy file location.
pub const CONFIG_ENV: &str = "HOSTAUDIT_CONFIG";

/// Policy file used when `HOSTAUDIT_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/hostaudit/config.toml";

/// Baseline policy for one host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Server hosts never get warnings, broadcasts or shutdowns.
    #[serde(default)]
    pub server_mode: bool,

    /// Days a host may stay non-compliant before shutdown (default: 7).
    #[serde(default = "default_grace_period_days")]
    pub grace_period_days: u32,

    /// Warning window handed to the shutdown initiator (default: 15).
    #[serde(default = "default_shutdown_delay_minutes")]
    pub shutdown_delay_minutes: u32,

    /// Hard cap on check/recover rounds per domain (default: 8).
    #[serde(default = "default_max_recovery_rounds")]
    pub max_recovery_rounds: u32,

    /// Where state and output live.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Firewall domain settings.
    #[serde(default)]
    pub firewall: FirewallConfig,

    /// Software freshness settings.
    #[serde(default)]
    pub software: SoftwareConfig,

    /// Anti-malware settings.
    #[serde(default)]
    pub malware: MalwareConfig,

    /// Authentication settings.
    #[serde(default)]
    pub authentication: AuthConfig,
}

/// Locations of the run log, escalation marker and login notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Append-only run log (default: /var/log/hostaudit.log).
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Escalation deadline marker (default: /var/lib/hostaudit/critical-time).
    #[serde(default = "default_marker_file")]
    pub marker_file: PathBuf,

    /// File the login-time warning is installed into (default: /etc/motd).
    #[serde(default = "default_login_notice")]
    pub login_notice: PathBuf,
}

/// Firewall domain settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallConfig {
    /// Fewest rules that count as "a firewall is loaded".
    #[serde(default = "default_min_rules")]
    pub min_rules: usize,

    /// Rule set restored when no rules are loaded.
    #[serde(default = "default_firewall_rules")]
    pub default_rules: PathBuf,
}

/// Software freshness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftwareConfig {
    /// APT periodic configuration file.
    #[serde(default = "default_auto_upgrade_config")]
    pub auto_upgrade_config: PathBuf,

    /// Pending updates tolerated before the domain fails.
    #[serde(default)]
    pub max_pending_updates: usize,
}

/// Anti-malware settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MalwareConfig {
    /// Scanner binary.
    #[serde(default = "default_scanner")]
    pub scanner: PathBuf,

    /// Cron file the scan job is installed into.
    #[serde(default = "default_schedule_file")]
    pub schedule_file: PathBuf,

    /// Cron schedule expression for the scan.
    #[serde(default = "default_schedule")]
    pub schedule: String,

    /// Directory tree the scan covers.
    #[serde(default = "default_scan_root")]
    pub scan_root: PathBuf,
}

/// Authentication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// PAM password stack.
    #[serde(default = "default_pam_password")]
    pub pam_password: PathBuf,

    /// Known-good copy restored over `pam_password`.
    #[serde(default = "default_pam_template")]
    pub pam_template: PathBuf,

    /// Shadow suite configuration.
    #[serde(default = "default_login_defs")]
    pub login_defs: PathBuf,

    /// User account database.
    #[serde(default = "default_passwd")]
    pub passwd: PathBuf,

    /// Shadow password database.
    #[serde(default = "default_shadow")]
    pub shadow: PathBuf,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            server_mode: false,
            grace_period_days: default_grace_period_days(),
            shutdown_delay_minutes: default_shutdown_delay_minutes(),
            max_recovery_rounds: default_max_recovery_rounds(),
            paths: PathsConfig::default(),
            firewall: FirewallConfig::default(),
            software: SoftwareConfig::default(),
            malware: MalwareConfig::default(),
            authentication: AuthConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            marker_file: default_marker_file(),
            login_notice: default_login_notice(),
        }
    }
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            min_rules: default_min_rules(),
            default_rules: default_firewall_rules(),
        }
    }
}

impl Default for SoftwareConfig {
    fn default() -> Self {
        Self {
            auto_upgrade_config: default_auto_upgrade_config(),
            max_pending_updates: 0,
        }
    }
}

impl Default for MalwareConfig {
    fn default() -> Self {
        Self {
            scanner: default_scanner(),
            schedule_file: default_schedule_file(),
            schedule: default_schedule(),
            scan_root: default_scan_root(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            pam_password: default_pam_password(),
            pam_template: default_pam_template(),
            login_defs: default_login_defs(),
            passwd: default_passwd(),
            shadow: default_shadow(),
        }
    }
}

impl Policy {
    /// Resolve the policy file location from the environment.
    #[must_use]
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
    }

    /// Load the policy from a TOML file, falling back to defaults when absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
        let policy: Self = toml::from_str(&content)
            .map_err(|e| AuditError::Config(format!("{}: {e}", path.display())))?;
        policy.validate()?;

        Ok(policy)
    }

    /// Reject values the escalation and runner logic cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.grace_period_days == 0 {
            return Err(AuditError::Config(
                "grace_period_days must be at least 1".into(),
            ));
        }
        if self.max_recovery_rounds == 0 {
            return Err(AuditError::Config(
                "max_recovery_rounds must be at least 1".into(),
            ));
        }
        if self.malware.schedule.split_whitespace().count() != 5 {
            return Err(AuditError::Config(format!(
                "malware.schedule must have five cron fields, got {:?}",
                self.malware.schedule
            )));
        }
        Ok(())
    }

    /// Grace period as a duration.
    #[must_use]
    pub fn grace_period(&self) -> Duration {
        Duration::days(i64::from(self.grace_period_days))
    }
}

// Default value functions for serde.
const fn default_grace_period_days() -> u32 {
    7
}

const fn default_shutdown_delay_minutes() -> u32 {
    15
}

const fn default_max_recovery_rounds() -> u32 {
    8
}

const fn default_min_rules() -> usize {
    1
}

fn default_log_file() -> PathBuf {
    PathBuf::from("/var/log/hostaudit.log")
}

fn default_marker_file() -> PathBuf {
    PathBuf::from("/var/lib/hostaudit/critical-time")
}

fn default_login_notice() -> PathBuf {
    PathBuf::from("/etc/motd")
}

fn default_firewall_rules() -> PathBuf {
    PathBuf::from("/etc/hostaudit/firewall.rules")
}

fn default_auto_upgrade_config() -> PathBuf {
    PathBuf::from("/etc/apt/apt.conf.d/20auto-upgrades")
}

fn default_scanner() -> PathBuf {
    PathBuf::from("/usr/bin/clamscan")
}

fn default_schedule_file() -> PathBuf {
    PathBuf::from("/etc/cron.d/hostaudit-malware-scan")
}

fn default_schedule() -> String {
    String::from("30 3 * * *")
}

fn default_scan_root() -> PathBuf {
    PathBuf::from("/home")
}

fn default_pam_password() -> PathBuf {
    PathBuf::from("/etc/pam.d/common-password")
}

fn default_pam_template() -> PathBuf {
    PathBuf::from("/etc/hostaudit/common-password")
}

fn default_login_defs() -> PathBuf {
    PathBuf::from("/etc/login.defs")
}

fn default_passwd() -> PathBuf {
    PathBuf::from("/etc/passwd")
}

fn default_shadow() -> PathBuf {
    PathBuf::from("/etc/shadow")
}
