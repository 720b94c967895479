//! `passwd` and `shadow` credential stores.

use std::collections::BTreeSet;

use hostaudit_core::{AuditError, Result};

/// Hash prefixes accepted as strong: SHA-512, yescrypt, gost-yescrypt,
/// scrypt and bcrypt.
pub const STRONG_PREFIXES: &[&str] = &["$6$", "$y$", "$gy$", "$7$", "$2b$", "$2y$"];

/// How a shadow password field is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    /// Login by password disabled (`!`, `*`, `!!`, `!$6$...`)
    Locked,
    /// No password at all
    Empty,
    /// Acceptable scheme
    Strong,
    /// MD5, SHA-256, DES or anything unrecognised
    Weak,
}

/// One shadow record, reduced to what the checks need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowEntry {
    /// Login name
    pub user: String,
    /// Encoded password field
    pub hash: String,
}

impl ShadowEntry {
    /// Classify the password field.
    #[must_use]
    pub fn scheme(&self) -> HashScheme {
        let hash = self.hash.as_str();
        if hash.is_empty() {
            HashScheme::Empty
        } else if hash.starts_with('!') || hash.starts_with('*') {
            HashScheme::Locked
        } else if STRONG_PREFIXES.iter().any(|p| hash.starts_with(p)) {
            HashScheme::Strong
        } else {
            HashScheme::Weak
        }
    }
}

fn records(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// User names in a passwd file.
pub fn passwd_users(text: &str) -> Result<BTreeSet<String>> {
    records(text)
        .map(|(lineno, line)| {
            let fields: Vec<&str> = line.split(':').collect();
            if fields.len() != 7 || fields[0].is_empty() {
                return Err(AuditError::parse(
                    "passwd",
                    format!("line {lineno}: expected 7 fields, got {}", fields.len()),
                ));
            }
            Ok(fields[0].to_string())
        })
        .collect()
}

/// Records of a shadow file.
pub fn shadow_entries(text: &str) -> Result<Vec<ShadowEntry>> {
    records(text)
        .map(|(lineno, line)| {
            let mut fields = line.split(':');
            let user = fields.next().unwrap_or_default();
            let hash = fields.next().ok_or_else(|| {
                AuditError::parse("shadow", format!("line {lineno}: missing password field"))
            })?;
            if user.is_empty() {
                return Err(AuditError::parse(
                    "shadow",
                    format!("line {lineno}: empty user name"),
                ));
            }
            Ok(ShadowEntry {
                user: user.to_string(),
                hash: hash.to_string(),
            })
        })
        .collect()
}

/// Users whose password field is usable but not strongly encoded.
///
/// Locked accounts are skipped; an empty field (no password) counts as weak.
#[must_use]
pub fn weakly_encoded(entries: &[ShadowEntry]) -> Vec<&str> {
    entries
        .iter()
        .filter(|e| matches!(e.scheme(), HashScheme::Weak | HashScheme::Empty))
        .map(|e| e.user.as_str())
        .collect()
}

/// Users present in exactly one of the two stores.
#[must_use]
pub fn store_mismatch(passwd: &BTreeSet<String>, shadow: &[ShadowEntry]) -> Vec<String> {
    let shadow_users: BTreeSet<String> = shadow.iter().map(|e| e.user.clone()).collect();
    passwd
        .symmetric_difference(&shadow_users)
        .cloned()
        .collect()
}
