//! The persisted "critical-time" deadline.
//!
//! One file holding the deadline as decimal seconds since the epoch,
//! newline terminated. Absent means the last run was compliant.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use hostaudit_core::{AuditError, Result};

/// File-backed escalation deadline.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    path: PathBuf,
}

impl MarkerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored deadline, `None` if there is no marker.
    ///
    /// A marker that exists but does not hold a timestamp is an
    /// [`AuditError::Marker`].
    pub fn read(&self) -> Result<Option<DateTime<Utc>>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AuditError::io(&self.path, e)),
        };

        let secs: i64 = text.trim().parse().map_err(|_| {
            AuditError::Marker(format!(
                "{}: not a timestamp: {:?}",
                self.path.display(),
                text.trim()
            ))
        })?;

        DateTime::from_timestamp(secs, 0).map(Some).ok_or_else(|| {
            AuditError::Marker(format!("{}: timestamp {secs} out of range", self.path.display()))
        })
    }

    /// Persist `deadline`, replacing any previous marker.
    pub fn write(&self, deadline: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AuditError::io(parent, e))?;
        }
        std::fs::write(&self.path, format!("{}\n", deadline.timestamp()))
            .map_err(|e| AuditError::io(&self.path, e))
    }

    /// Delete the marker; a missing marker is fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuditError::io(&self.path, e)),
        }
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
