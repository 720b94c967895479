//! Authentication: password hashing configuration and credential stores.

use hostaudit_core::{Domain, RecoveryId, Result};

use crate::check::{ComplianceCheck, Condition, Finding};
use crate::formats::{accounts, login_defs, pam};
use crate::host::CredentialHost;
use crate::recovery::Recovery;

/// Conditions:
/// 1. PAM password stack hashes strongly (recoverable: restore the template)
/// 2. `ENCRYPT_METHOD` is strong (recoverable: rewrite the field)
/// 3. every usable shadow hash is strong (terminal)
/// 4. passwd and shadow list the same users (terminal)
///
/// Users inconsistent across the two stores is never fixed automatically:
/// both files are identity sources and neither is trusted over the other.
pub struct AuthenticationCheck<'a> {
    host: &'a dyn CredentialHost,
}

impl<'a> AuthenticationCheck<'a> {
    /// File locations are the host's concern; the check only reads content.
    pub fn new(host: &'a dyn CredentialHost) -> Self {
        Self { host }
    }

    fn pam_stack(&self) -> Result<Finding> {
        let Some(text) = self.host.pam_password()? else {
            return Ok(Finding::new(false, "stack absent"));
        };
        let finding = match pam::Stack::parse(&text) {
            Ok(stack) if stack.has_strong_unix_hashing() => {
                Finding::new(true, "pam_unix.so hashes strongly")
            }
            Ok(_) => Finding::new(false, "no strong pam_unix.so password directive"),
            Err(e) => Finding::new(false, format!("unparsable: {e}")),
        };
        Ok(finding)
    }

    fn encrypt_method(&self) -> Result<Finding> {
        let text = self.host.login_defs()?;
        let method = login_defs::get(&text, login_defs::ENCRYPT_METHOD).unwrap_or("unset");
        Ok(Finding::new(
            login_defs::has_strong_encrypt_method(&text),
            format!("{} {method}", login_defs::ENCRYPT_METHOD),
        ))
    }

    fn set_encrypt_method(&self) -> Result<()> {
        let text = self.host.login_defs()?;
        self.host.write_login_defs(&login_defs::set(
            &text,
            login_defs::ENCRYPT_METHOD,
            login_defs::DEFAULT_METHOD,
        ))
    }

    fn hash_encoding(&self) -> Result<Finding> {
        let entries = accounts::shadow_entries(&self.host.shadow()?)?;
        let weak = accounts::weakly_encoded(&entries);
        if weak.is_empty() {
            Ok(Finding::new(true, format!("{} entries strong or locked", entries.len())))
        } else {
            Ok(Finding::new(false, format!("weak hashes for {}", weak.join(", "))))
        }
    }

    fn stores_consistent(&self) -> Result<Finding> {
        let users = accounts::passwd_users(&self.host.passwd()?)?;
        let entries = accounts::shadow_entries(&self.host.shadow()?)?;
        let mismatch = accounts::store_mismatch(&users, &entries);
        if mismatch.is_empty() {
            Ok(Finding::new(true, format!("{} users in both stores", users.len())))
        } else {
            Ok(Finding::new(
                false,
                format!("users in only one store: {}", mismatch.join(", ")),
            ))
        }
    }
}

impl ComplianceCheck for AuthenticationCheck<'_> {
    fn domain(&self) -> Domain {
        Domain::Authentication
    }

    fn conditions(&self) -> Vec<Condition<'_>> {
        vec![
            Condition::recoverable(
                "pam password stack",
                move || self.pam_stack(),
                Recovery::new(RecoveryId::RestorePamStack, move || {
                    self.host.restore_pam_password()
                }),
            ),
            Condition::recoverable(
                "encrypt method",
                move || self.encrypt_method(),
                Recovery::new(RecoveryId::SetEncryptMethod, move || {
                    self.set_encrypt_method()
                }),
            ),
            Condition::terminal("hash encoding", move || self.hash_encoding()),
            Condition::terminal("stores consistent", move || self.stores_consistent()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner;
    use crate::testing::{memory_context, FakeHost};
    use hostaudit_core::Verdict;

    fn run(host: &FakeHost) -> (Verdict, u32, String) {
        let (mut ctx, out) = memory_context();
        let verdict = runner::run(&AuthenticationCheck::new(host), &mut ctx, 8);
        (verdict, ctx.guards.total_attempts(), out.contents())
    }

    #[test]
    fn hardened_host_passes() {
        let host = FakeHost::compliant();
        let (verdict, attempts, _) = run(&host);
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(attempts, 0);
    }

    #[test]
    fn weak_pam_stack_is_restored() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().pam = Some("password required pam_unix.so md5\n".into());
        let (verdict, attempts, log) = run(&host);
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(attempts, 1);
        assert_eq!(host.calls("restore_pam_password"), 1);
        assert!(log.contains("recovery restore-pam-stack: applied"));
    }

    #[test]
    fn unparsable_pam_stack_is_restored() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().pam = Some("this is not pam\n".into());
        let (verdict, _, log) = run(&host);
        assert_eq!(verdict, Verdict::Pass);
        assert!(log.contains("pam password stack: unparsable"));
    }

    #[test]
    fn both_recoveries_run_in_one_invocation() {
        let host = FakeHost::compliant();
        {
            let mut state = host.state.borrow_mut();
            state.pam = None;
            state.login_defs = "UMASK 022\nENCRYPT_METHOD MD5\n".into();
        }
        let (verdict, attempts, _) = run(&host);
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(attempts, 2);
        assert!(login_defs::has_strong_encrypt_method(
            &host.state.borrow().login_defs
        ));
        assert!(host.state.borrow().login_defs.starts_with("UMASK 022\n"));
    }

    #[test]
    fn broken_template_degrades_to_fail() {
        let host = FakeHost::compliant();
        {
            let mut state = host.state.borrow_mut();
            state.pam = None;
            state.pam_template = "password required pam_unix.so md5\n".into();
        }
        let (verdict, attempts, log) = run(&host);
        assert_eq!(verdict, Verdict::Fail);
        assert_eq!(attempts, 1);
        assert!(log.contains("recovery restore-pam-stack: already tried"));
    }

    #[test]
    fn weak_shadow_hash_is_terminal() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().shadow =
            "root:*:19000:0:99999:7:::\nalice:$1$salt$hash:19500:0:99999:7:::\n".into();
        let (verdict, attempts, log) = run(&host);
        assert_eq!(verdict, Verdict::Fail);
        assert_eq!(attempts, 0);
        assert!(log.contains("hash encoding: weak hashes for alice: violated"));
    }

    #[test]
    fn disjoint_stores_fail_without_recovery() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().shadow =
            "mallory:$6$salt$hash:19500:0:99999:7:::\n".into();
        let (verdict, attempts, log) = run(&host);
        assert_eq!(verdict, Verdict::Fail);
        assert_eq!(attempts, 0);
        assert!(log.contains("users in only one store: alice, mallory, root"));
        assert!(log.contains("stores consistent: no automatic recovery"));
    }

    #[test]
    fn unreadable_shadow_is_fail() {
        let host = FakeHost::compliant();
        host.state.borrow_mut().shadow = "root\n".into();
        let (verdict, _, log) = run(&host);
        assert_eq!(verdict, Verdict::Fail);
        assert!(log.contains("hash encoding: probe failed"));
    }
}
