//! Search job tracking.
//!
//! A simple in-memory tracker that stores phase progress and log lines for
//! background searches, so clients can poll or stream them.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{CandidateId, SearchId, SessionId};

/// A single log entry with timestamp and message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchLogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl SearchStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, SearchStatus::Running)
    }
}

/// Search metadata and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchJob {
    pub search_id: SearchId,
    pub session_id: SessionId,
    pub status: SearchStatus,
    pub phase_count: usize,
    pub phase_index: Option<usize>,
    pub phase_label: Option<String>,
    pub logs: Vec<SearchLogEntry>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Candidate found, once completed
    pub candidate_id: Option<CandidateId>,
}

/// In-memory search tracker.
#[derive(Clone, Default)]
pub struct SearchTracker {
    jobs: Arc<RwLock<HashMap<SearchId, SearchJob>>>,
}

impl SearchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a running search and return its ID.
    pub fn create_search(&self, session_id: SessionId, phase_count: usize) -> SearchId {
        let search_id = SearchId::new();
        let job = SearchJob {
            search_id,
            session_id,
            status: SearchStatus::Running,
            phase_count,
            phase_index: None,
            phase_label: None,
            logs: vec![],
            created_at: Utc::now(),
            completed_at: None,
            candidate_id: None,
        };
        self.jobs.write().insert(search_id, job);
        search_id
    }

    pub fn log(&self, search_id: SearchId, level: LogLevel, message: impl Into<String>) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(&search_id) {
            job.logs.push(SearchLogEntry {
                timestamp: Utc::now(),
                level,
                message: message.into(),
            });
        }
    }

    /// Record the phase now in progress; its label doubles as a log line.
    pub fn enter_phase(&self, search_id: SearchId, index: usize, label: &str) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(&search_id) {
            job.phase_index = Some(index);
            job.phase_label = Some(label.to_string());
            job.logs.push(SearchLogEntry {
                timestamp: Utc::now(),
                level: LogLevel::Info,
                message: label.to_string(),
            });
        }
    }

    pub fn complete(&self, search_id: SearchId, candidate_id: CandidateId) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(&search_id) {
            job.status = SearchStatus::Completed;
            job.completed_at = Some(Utc::now());
            job.logs.push(SearchLogEntry {
                timestamp: Utc::now(),
                level: LogLevel::Success,
                message: format!("Candidate found: {}", candidate_id),
            });
            job.candidate_id = Some(candidate_id);
        }
    }

    /// Mark a running search cancelled. Finished searches keep their status.
    pub fn cancel(&self, search_id: SearchId) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(&search_id) {
            if job.status == SearchStatus::Running {
                job.status = SearchStatus::Cancelled;
                job.completed_at = Some(Utc::now());
                job.logs.push(SearchLogEntry {
                    timestamp: Utc::now(),
                    level: LogLevel::Warning,
                    message: "Search cancelled".to_string(),
                });
            }
        }
    }

    pub fn fail(&self, search_id: SearchId, error_message: impl Into<String>) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(&search_id) {
            job.status = SearchStatus::Failed;
            job.completed_at = Some(Utc::now());
            job.logs.push(SearchLogEntry {
                timestamp: Utc::now(),
                level: LogLevel::Error,
                message: error_message.into(),
            });
        }
    }

    pub fn get(&self, search_id: SearchId) -> Option<SearchJob> {
        self.jobs.read().get(&search_id).cloned()
    }

    pub fn logs(&self, search_id: SearchId) -> Vec<SearchLogEntry> {
        self.jobs
            .read()
            .get(&search_id)
            .map(|job| job.logs.clone())
            .unwrap_or_default()
    }

    /// Drop every search belonging to `session_id`.
    pub fn forget_session(&self, session_id: SessionId) {
        self.jobs.write().retain(|_, job| job.session_id != session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let tracker = SearchTracker::new();
        let id = tracker.create_search(SessionId::new(), 2);
        assert_eq!(tracker.get(id).unwrap().status, SearchStatus::Running);

        tracker.enter_phase(id, 0, "Connecting to database...");
        tracker.enter_phase(id, 1, "Fetching star data...");
        let job = tracker.get(id).unwrap();
        assert_eq!(job.phase_index, Some(1));
        assert_eq!(job.phase_label.as_deref(), Some("Fetching star data..."));

        tracker.complete(id, CandidateId::new("toi-715b"));
        let job = tracker.get(id).unwrap();
        assert_eq!(job.status, SearchStatus::Completed);
        assert_eq!(job.candidate_id, Some(CandidateId::new("toi-715b")));
        assert_eq!(tracker.logs(id).len(), 3);
    }

    #[test]
    fn test_cancel_does_not_override_completion() {
        let tracker = SearchTracker::new();
        let id = tracker.create_search(SessionId::new(), 1);
        tracker.complete(id, CandidateId::new("k2-18b"));
        tracker.cancel(id);
        assert_eq!(tracker.get(id).unwrap().status, SearchStatus::Completed);

        let other = tracker.create_search(SessionId::new(), 1);
        tracker.cancel(other);
        assert_eq!(tracker.get(other).unwrap().status, SearchStatus::Cancelled);
        assert!(tracker.get(other).unwrap().status.is_finished());
    }

    #[test]
    fn test_fail_records_message() {
        let tracker = SearchTracker::new();
        let id = tracker.create_search(SessionId::new(), 1);
        tracker.fail(id, "catalog is empty");
        let job = tracker.get(id).unwrap();
        assert_eq!(job.status, SearchStatus::Failed);
        assert_eq!(job.logs.last().unwrap().level, LogLevel::Error);
    }

    #[test]
    fn test_unknown_search() {
        let tracker = SearchTracker::new();
        let id = SearchId::new();
        tracker.log(id, LogLevel::Info, "ignored");
        assert!(tracker.get(id).is_none());
        assert!(tracker.logs(id).is_empty());
    }

    #[test]
    fn test_forget_session() {
        let tracker = SearchTracker::new();
        let session = SessionId::new();
        let a = tracker.create_search(session, 1);
        let b = tracker.create_search(SessionId::new(), 1);
        tracker.forget_session(session);
        assert!(tracker.get(a).is_none());
        assert!(tracker.get(b).is_some());
    }
}
