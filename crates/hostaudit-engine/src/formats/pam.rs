//! PAM stack files (`/etc/pam.d/*`).
//!
//! A stack is parsed into directives `{facility, control, module, args}`
//! so compliance is decided by which modules are configured, not by how
//! the file happens to be formatted.

use hostaudit_core::{AuditError, Result};

/// Hash arguments to `pam_unix.so` accepted as strong.
pub const STRONG_HASH_ARGS: &[&str] = &["sha512", "yescrypt"];

/// PAM management group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facility {
    /// Authentication
    Auth,
    /// Account management
    Account,
    /// Password updates
    Password,
    /// Session setup
    Session,
}

impl Facility {
    fn parse(word: &str) -> Option<Self> {
        // A leading '-' means "skip silently if the module is missing".
        match word.trim_start_matches('-').to_ascii_lowercase().as_str() {
            "auth" => Some(Self::Auth),
            "account" => Some(Self::Account),
            "password" => Some(Self::Password),
            "session" => Some(Self::Session),
            _ => None,
        }
    }
}

/// One module line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Management group
    pub facility: Facility,
    /// Control flag, simple (`required`) or bracketed (`[success=1 default=ignore]`)
    pub control: String,
    /// Module path or name
    pub module: String,
    /// Module arguments
    pub args: Vec<String>,
}

impl Directive {
    /// Module name without directory, e.g. `pam_unix.so`.
    #[must_use]
    pub fn module_name(&self) -> &str {
        self.module.rsplit('/').next().unwrap_or(&self.module)
    }

    /// Whether `arg` is present, by itself or as `arg=value`.
    #[must_use]
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args
            .iter()
            .any(|a| a == arg || a.split_once('=').is_some_and(|(k, _)| k == arg))
    }
}

/// A parsed stack file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    /// Module lines in file order
    pub directives: Vec<Directive>,
    /// `@include` targets in file order
    pub includes: Vec<String>,
}

impl Stack {
    /// Parse a stack file.
    pub fn parse(text: &str) -> Result<Self> {
        let mut stack = Self::default();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            if let Some(target) = line.strip_prefix("@include") {
                stack.includes.push(target.trim().to_string());
                continue;
            }

            stack.directives.push(parse_directive(line).ok_or_else(|| {
                AuditError::parse("PAM stack", format!("line {}: {line:?}", idx + 1))
            })?);
        }

        Ok(stack)
    }

    /// Directives of one facility.
    pub fn facility(&self, facility: Facility) -> impl Iterator<Item = &Directive> {
        self.directives
            .iter()
            .filter(move |d| d.facility == facility)
    }

    /// A `password` directive hashes with `pam_unix.so` and a strong scheme.
    #[must_use]
    pub fn has_strong_unix_hashing(&self) -> bool {
        self.facility(Facility::Password).any(|d| {
            d.module_name() == "pam_unix.so" && STRONG_HASH_ARGS.iter().any(|a| d.has_arg(a))
        })
    }
}

fn parse_directive(line: &str) -> Option<Directive> {
    let (facility_word, rest) = line.split_once(char::is_whitespace)?;
    let facility = Facility::parse(facility_word)?;
    let rest = rest.trim_start();

    let (control, rest) = if rest.starts_with('[') {
        let end = rest.find(']')?;
        (&rest[..=end], &rest[end + 1..])
    } else {
        rest.split_once(char::is_whitespace)?
    };

    let mut words = rest.split_whitespace();
    let module = words.next()?.to_string();
    let args = words.map(str::to_string).collect();

    Some(Directive {
        facility,
        control: control.to_string(),
        module,
        args,
    })
}
