//! `iptables -S` output.

/// Count appended rules (`-A CHAIN ...`); policy lines (`-P`) and chain
/// declarations (`-N`) are not rules.
#[must_use]
pub fn count_rules(listing: &str) -> usize {
    listing
        .lines()
        .filter(|l| l.trim_start().starts_with("-A "))
        .count()
}
