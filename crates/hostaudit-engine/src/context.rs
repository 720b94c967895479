//! Per-invocation run context.

use crate::recovery::GuardSet;
use crate::runlog::RunLog;

/// State that lives exactly as long as one invocation.
///
/// The guards make the one-shot scope of every recovery action explicit:
/// a new context means every action may fire once more.
#[derive(Debug)]
pub struct RunContext {
    /// Recovery guards for this invocation
    pub guards: GuardSet,
    /// Append-only run log
    pub log: RunLog,
}

impl RunContext {
    /// Start an invocation with fresh guards.
    #[must_use]
    pub fn new(log: RunLog) -> Self {
        Self {
            guards: GuardSet::new(),
            log,
        }
    }
}
