//! APT periodic configuration and upgrade simulation output.

use std::collections::BTreeMap;

/// Directive refreshing package lists.
pub const UPDATE_LISTS: &str = "APT::Periodic::Update-Package-Lists";

/// Directive running unattended-upgrades.
pub const UNATTENDED_UPGRADE: &str = "APT::Periodic::Unattended-Upgrade";

/// Configuration written when automatic upgrades are off.
pub const AUTO_UPGRADES: &str = "// Installed by hostaudit\n\
APT::Periodic::Update-Package-Lists \"1\";\n\
APT::Periodic::Unattended-Upgrade \"1\";\n";

/// Parse `Key "value";` directives. Keys are case-insensitive in APT, so
/// they are lowercased. Comments and malformed lines are skipped.
#[must_use]
pub fn parse_directives(text: &str) -> BTreeMap<String, String> {
    let mut directives = BTreeMap::new();

    for raw in text.lines() {
        let line = raw.split("//").next().unwrap_or("");
        let line = line.split('#').next().unwrap_or("").trim();
        let line = line.trim_end_matches(';').trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(char::is_whitespace) else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        directives.insert(key.to_ascii_lowercase(), value.to_string());
    }

    directives
}

/// Interval in days for a periodic directive; 0 when absent or disabled.
#[must_use]
pub fn interval_days(directives: &BTreeMap<String, String>, key: &str) -> u32 {
    directives
        .get(&key.to_ascii_lowercase())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Both list refresh and unattended upgrades run at some interval.
#[must_use]
pub fn auto_upgrades_enabled(text: &str) -> bool {
    let directives = parse_directives(text);
    interval_days(&directives, UPDATE_LISTS) > 0 && interval_days(&directives, UNATTENDED_UPGRADE) > 0
}

/// Count packages `apt-get -s upgrade` would install.
#[must_use]
pub fn count_pending(simulation: &str) -> usize {
    simulation
        .lines()
        .filter(|l| l.starts_with("Inst "))
        .count()
}
