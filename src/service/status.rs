//! Per-upload processing status

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress after the upload has been saved
pub const PROGRESS_SAVED: u8 = 20;

/// Progress once the output path is prepared
pub const PROGRESS_PREPARED: u8 = 40;

pub const PROGRESS_DONE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Started,
    Completed,
    Error,
    Unknown,
}

/// Status record returned for a process id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStatus {
    pub status: StatusKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProcessingStatus {
    fn new(status: StatusKind, progress: u8) -> Self {
        Self {
            status,
            progress: Some(progress),
            updated_at: Some(Utc::now()),
        }
    }

    /// Record for an id that was never seen
    pub fn unknown() -> Self {
        Self {
            status: StatusKind::Unknown,
            progress: None,
            updated_at: None,
        }
    }
}

/// Thread-safe table of status records keyed by process id
#[derive(Debug, Default)]
pub struct StatusTable {
    entries: Mutex<HashMap<String, ProcessingStatus>>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ProcessingStatus>> {
        // A panic while holding the lock cannot leave a record half-written
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn start(&self, pid: &str) {
        self.lock()
            .insert(pid.to_string(), ProcessingStatus::new(StatusKind::Started, 0));
    }

    pub fn set_progress(&self, pid: &str, progress: u8) {
        if let Some(entry) = self.lock().get_mut(pid) {
            entry.progress = Some(progress);
            entry.updated_at = Some(Utc::now());
        }
    }

    pub fn complete(&self, pid: &str) {
        self.lock().insert(
            pid.to_string(),
            ProcessingStatus::new(StatusKind::Completed, PROGRESS_DONE),
        );
    }

    /// Mark as failed, keeping the last progress value
    pub fn fail(&self, pid: &str) {
        let mut entries = self.lock();
        let progress = entries.get(pid).and_then(|e| e.progress).unwrap_or(0);
        entries.insert(
            pid.to_string(),
            ProcessingStatus::new(StatusKind::Error, progress),
        );
    }

    pub fn get(&self, pid: &str) -> ProcessingStatus {
        self.lock()
            .get(pid)
            .cloned()
            .unwrap_or_else(ProcessingStatus::unknown)
    }

    /// Drop completed and failed records, returning how many were removed
    ///
    /// Records still in progress are kept.
    pub fn prune_finished(&self) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, e| e.status == StatusKind::Started);
        before - entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lifecycle() {
        let table = StatusTable::new();
        table.start("abc");
        assert_eq!(table.get("abc").status, StatusKind::Started);
        assert_eq!(table.get("abc").progress, Some(0));

        table.set_progress("abc", PROGRESS_PREPARED);
        assert_eq!(table.get("abc").progress, Some(40));

        table.complete("abc");
        let status = table.get("abc");
        assert_eq!(status.status, StatusKind::Completed);
        assert_eq!(status.progress, Some(100));
    }

    #[test]
    fn test_fail_keeps_progress() {
        let table = StatusTable::new();
        table.start("abc");
        table.set_progress("abc", PROGRESS_SAVED);
        table.fail("abc");
        assert_eq!(table.get("abc").status, StatusKind::Error);
        assert_eq!(table.get("abc").progress, Some(20));
    }

    #[test]
    fn test_unknown_serializes_without_progress() {
        let table = StatusTable::new();
        let json = serde_json::to_value(table.get("missing")).unwrap();
        assert_eq!(json, json!({ "status": "unknown" }));
    }

    #[test]
    fn test_prune_finished_keeps_running_uploads() {
        let table = StatusTable::new();
        table.start("done");
        table.complete("done");
        table.start("failed");
        table.fail("failed");
        table.start("running");
        table.set_progress("running", PROGRESS_SAVED);

        assert_eq!(table.prune_finished(), 2);
        assert_eq!(table.get("done").status, StatusKind::Unknown);
        assert_eq!(table.get("failed").status, StatusKind::Unknown);
        assert_eq!(table.get("running").status, StatusKind::Started);
        assert_eq!(table.prune_finished(), 0);
    }

    #[test]
    fn test_progress_on_unknown_id_is_ignored() {
        let table = StatusTable::new();
        table.set_progress("ghost", 50);
        assert!(table.is_empty());
    }
}
