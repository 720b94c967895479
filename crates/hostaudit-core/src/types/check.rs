//! Check, recovery and verdict result types.

use serde::{Deserialize, Serialize};

use super::domain::Domain;

/// Outcome of a single check pass over a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckResult {
    /// Every condition holds
    Pass,
    /// A condition is violated and nothing more can be done automatically
    Fail,
    /// A remediation was applied; the domain must be probed again
    Recovered,
}

/// Final verdict of a domain after the check/recover cycle settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Compliant
    Pass,
    /// Not compliant
    Fail,
    /// The cycle did not settle within its round bound
    Unknown,
}

impl Verdict {
    /// Only `Pass` counts towards overall compliance.
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Result of asking a recovery action to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryOutcome {
    /// The mutation ran and reported success
    Ok,
    /// The guard had already fired in this invocation; nothing was touched
    AlreadyAttempted,
    /// The mutation ran and reported an error
    Failed,
}

/// Identity of each one-shot remediation.
///
/// Every action owns exactly one external resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryId {
    /// Restore the default firewall rule set
    LoadFirewallRules,
    /// Turn on periodic unattended upgrades
    EnableAutoUpgrades,
    /// Install the scheduled malware scan job
    ScheduleMalwareScan,
    /// Restore the PAM password stack from its template
    RestorePamStack,
    /// Rewrite the password hashing method in login.defs
    SetEncryptMethod,
}

impl RecoveryId {
    /// The domain whose check owns this action.
    #[must_use]
    pub const fn domain(self) -> Domain {
        match self {
            Self::LoadFirewallRules => Domain::Firewall,
            Self::EnableAutoUpgrades => Domain::Software,
            Self::ScheduleMalwareScan => Domain::Malware,
            Self::RestorePamStack | Self::SetEncryptMethod => Domain::Authentication,
        }
    }

    /// Short name used in log lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LoadFirewallRules => "load-firewall-rules",
            Self::EnableAutoUpgrades => "enable-auto-upgrades",
            Self::ScheduleMalwareScan => "schedule-malware-scan",
            Self::RestorePamStack => "restore-pam-stack",
            Self::SetEncryptMethod => "set-encrypt-method",
        }
    }
}

impl std::fmt::Display for RecoveryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
