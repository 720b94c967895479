//! Audited compliance domains.

use serde::{Deserialize, Serialize};

/// One audited aspect of the host.
///
/// The declaration order is the fixed order the orchestrator runs them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Packet filter rules are loaded
    Firewall,
    /// Package updates are applied automatically and nothing is stale
    Software,
    /// An anti-malware scanner is installed and scheduled
    Malware,
    /// PAM and the credential stores are configured safely
    Authentication,
}

impl Domain {
    /// All domains in run order.
    pub const ALL: [Self; 4] = [
        Self::Firewall,
        Self::Software,
        Self::Malware,
        Self::Authentication,
    ];

    /// Short lowercase name used in log lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Firewall => "firewall",
            Self::Software => "software",
            Self::Malware => "malware",
            Self::Authentication => "authentication",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
