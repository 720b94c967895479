//! One-shot recovery actions and their per-invocation guards.
//!
//! A recovery action checks its guard first. If the guard already fired in
//! this invocation it returns [`RecoveryOutcome::AlreadyAttempted`] without
//! touching the host. Otherwise it marks the guard, runs its mutation and
//! reports [`RecoveryOutcome::Ok`] or [`RecoveryOutcome::Failed`]. It never
//! re-verifies its own effect; the originating check does that on the next
//! round.

use std::collections::BTreeMap;

use hostaudit_core::{AuditError, RecoveryId, RecoveryOutcome, Result};
use tracing::{info, warn};

use crate::context::RunContext;

/// Guards for every recovery action, scoped to one invocation.
#[derive(Debug, Default)]
pub struct GuardSet {
    attempts: BTreeMap<RecoveryId, u32>,
}

impl GuardSet {
    /// Fresh guards: nothing attempted yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Has this action already fired?
    #[must_use]
    pub fn is_spent(&self, id: RecoveryId) -> bool {
        self.attempts.contains_key(&id)
    }

    /// How many times the mutation of `id` actually ran (0 or 1).
    #[must_use]
    pub fn attempts(&self, id: RecoveryId) -> u32 {
        self.attempts.get(&id).copied().unwrap_or(0)
    }

    /// Total mutations run in this invocation.
    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.attempts.values().sum()
    }

    /// Run `mutation` unless `id` already fired.
    ///
    /// The guard is set before the mutation runs, so a failing mutation is
    /// spent too.
    pub fn apply(
        &mut self,
        id: RecoveryId,
        mutation: impl FnOnce() -> Result<()>,
    ) -> (RecoveryOutcome, Option<AuditError>) {
        if self.is_spent(id) {
            return (RecoveryOutcome::AlreadyAttempted, None);
        }
        self.attempts.insert(id, 1);

        match mutation() {
            Ok(()) => (RecoveryOutcome::Ok, None),
            Err(e) => (RecoveryOutcome::Failed, Some(e)),
        }
    }
}

type Mutation<'a> = Box<dyn Fn() -> Result<()> + 'a>;

/// A remediation bound to the one resource it owns.
pub struct Recovery<'a> {
    id: RecoveryId,
    mutate: Mutation<'a>,
}

impl<'a> Recovery<'a> {
    /// Wrap a mutation under its guard identity.
    pub fn new(id: RecoveryId, mutate: impl Fn() -> Result<()> + 'a) -> Self {
        Self {
            id,
            mutate: Box::new(mutate),
        }
    }

    /// Which guard this action uses.
    #[must_use]
    pub const fn id(&self) -> RecoveryId {
        self.id
    }

    /// Attempt the remediation once per invocation, logging the outcome.
    pub fn apply(&self, ctx: &mut RunContext) -> RecoveryOutcome {
        let domain = self.id.domain();
        let (outcome, error) = ctx.guards.apply(self.id, || (self.mutate)());

        match outcome {
            RecoveryOutcome::Ok => {
                info!(recovery = %self.id, "recovery applied");
                ctx.log
                    .item(domain, format_args!("recovery {}: applied", self.id));
            }
            RecoveryOutcome::AlreadyAttempted => {
                warn!(recovery = %self.id, "recovery already tried in this run");
                ctx.log
                    .item(domain, format_args!("recovery {}: already tried", self.id));
            }
            RecoveryOutcome::Failed => {
                let detail = error.map_or_else(|| "unknown error".to_string(), |e| e.to_string());
                warn!(recovery = %self.id, error = %detail, "recovery failed");
                ctx.log
                    .item(domain, format_args!("recovery {}: failed: {detail}", self.id));
            }
        }

        outcome
    }
}

impl std::fmt::Debug for Recovery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recovery").field("id", &self.id).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_context;
    use std::cell::Cell;

    #[test]
    fn second_attempt_is_refused_without_running() {
        let runs = Cell::new(0);
        let (mut ctx, out) = memory_context();
        let recovery = Recovery::new(RecoveryId::LoadFirewallRules, || {
            runs.set(runs.get() + 1);
            Ok(())
        });

        assert_eq!(recovery.apply(&mut ctx), RecoveryOutcome::Ok);
        assert_eq!(recovery.apply(&mut ctx), RecoveryOutcome::AlreadyAttempted);
        assert_eq!(runs.get(), 1);
        assert_eq!(ctx.guards.attempts(RecoveryId::LoadFirewallRules), 1);
        assert!(out.contents().contains("already tried"));
    }

    #[test]
    fn failed_mutation_still_spends_guard() {
        let (mut ctx, out) = memory_context();
        let recovery = Recovery::new(RecoveryId::SetEncryptMethod, || {
            Err(AuditError::Config("read-only".into()))
        });

        assert_eq!(recovery.apply(&mut ctx), RecoveryOutcome::Failed);
        assert!(ctx.guards.is_spent(RecoveryId::SetEncryptMethod));
        assert_eq!(recovery.apply(&mut ctx), RecoveryOutcome::AlreadyAttempted);
        assert!(out.contents().contains("failed: config error: read-only"));
    }

    #[test]
    fn guards_are_independent_per_action() {
        let mut guards = GuardSet::new();
        let (first, _) = guards.apply(RecoveryId::RestorePamStack, || Ok(()));
        let (second, _) = guards.apply(RecoveryId::SetEncryptMethod, || Ok(()));

        assert_eq!(first, RecoveryOutcome::Ok);
        assert_eq!(second, RecoveryOutcome::Ok);
        assert_eq!(guards.total_attempts(), 2);
        assert_eq!(guards.attempts(RecoveryId::LoadFirewallRules), 0);
    }

    #[test]
    fn fresh_guard_set_per_invocation() {
        let mut first_run = GuardSet::new();
        let _ = first_run.apply(RecoveryId::EnableAutoUpgrades, || Ok(()));

        let mut second_run = GuardSet::new();
        let (outcome, _) = second_run.apply(RecoveryId::EnableAutoUpgrades, || Ok(()));
        assert_eq!(outcome, RecoveryOutcome::Ok);
    }
}
