//! Simulated catalog search.
//!
//! A search walks through the phases of a [`SearchPlan`], logging each label
//! to the [`SearchTracker`], then selects a catalog entry, synthesizes its
//! light curve and completes the session's search ticket.
//!
//! Each session owns one [`SearchRunner`], which keeps at most one search
//! task alive: starting a new search, cancelling, or dropping the runner
//! aborts the previous task. The session is only touched after the last
//! timer fires, so an aborted task never leaves a half-applied result.

use log::{info, warn};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

use super::search_tracker::{LogLevel, SearchTracker};
use crate::api::{SearchId, SessionId};
use crate::catalog::{select_entry, CandidateCatalog, CatalogError, SelectionPolicy};
use crate::config::SynthesisConfig;
use crate::models::SearchFilters;
use crate::wizard::{SearchTicket, WizardResult, WizardSession};

const DEFAULT_PHASES: [(&str, u64); 5] = [
    ("Connecting to database...", 2000),
    ("Fetching star data...", 10000),
    ("Analyzing exoplanet patterns...", 5000),
    ("Validating transit signals...", 5000),
    ("Updating results...", 5000),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPhase {
    pub label: String,
    pub duration: Duration,
}

impl SearchPhase {
    pub fn new(label: impl Into<String>, duration: Duration) -> Self {
        Self {
            label: label.into(),
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchPlanError {
    #[error("search phase `{label}` must last longer than zero")]
    ZeroDuration { label: String },
}

/// Ordered search phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    phases: Vec<SearchPhase>,
}

impl Default for SearchPlan {
    fn default() -> Self {
        Self {
            phases: DEFAULT_PHASES
                .iter()
                .map(|(label, ms)| SearchPhase::new(*label, Duration::from_millis(*ms)))
                .collect(),
        }
    }
}

impl SearchPlan {
    pub fn new(phases: Vec<SearchPhase>) -> Result<Self, SearchPlanError> {
        if let Some(phase) = phases.iter().find(|p| p.duration.is_zero()) {
            return Err(SearchPlanError::ZeroDuration {
                label: phase.label.clone(),
            });
        }
        Ok(Self { phases })
    }

    pub fn phases(&self) -> &[SearchPhase] {
        &self.phases
    }

    pub fn total_duration(&self) -> Duration {
        self.phases.iter().map(|p| p.duration).sum()
    }
}

/// Everything a search task needs, shared across sessions.
#[derive(Clone)]
pub struct SearchContext {
    pub catalog: Arc<dyn CandidateCatalog>,
    pub policy: Arc<dyn SelectionPolicy>,
    pub plan: Arc<SearchPlan>,
    pub synthesis: SynthesisConfig,
    pub tracker: SearchTracker,
    pub rng: Arc<Mutex<StdRng>>,
}

struct ActiveSearch {
    id: SearchId,
    handle: JoinHandle<()>,
}

/// Owner of a session's background search.
pub struct SearchRunner {
    session_id: SessionId,
    session: Arc<Mutex<WizardSession>>,
    tracker: SearchTracker,
    active: Option<ActiveSearch>,
}

impl SearchRunner {
    pub fn new(
        session_id: SessionId,
        session: Arc<Mutex<WizardSession>>,
        tracker: SearchTracker,
    ) -> Self {
        Self {
            session_id,
            session,
            tracker,
            active: None,
        }
    }

    /// Start a search, aborting any search already in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, context: &SearchContext) -> WizardResult<SearchId> {
        let (ticket, filters) = {
            let mut session = self.session.lock();
            let ticket = session.begin_search()?;
            (ticket, session.filters())
        };
        self.abort_active();

        let search_id = self
            .tracker
            .create_search(self.session_id, context.plan.phases().len());
        info!(
            "Session {} started search {} (epoch {})",
            self.session_id,
            search_id,
            ticket.epoch()
        );

        let handle = tokio::spawn(run_search(
            search_id,
            ticket,
            filters,
            Arc::clone(&self.session),
            context.clone(),
        ));
        self.active = Some(ActiveSearch {
            id: search_id,
            handle,
        });
        Ok(search_id)
    }

    /// Abort the running search and release the session's ticket.
    pub fn cancel(&mut self) -> Option<SearchId> {
        let cancelled = self.abort_active();
        self.session.lock().cancel_search();
        cancelled
    }

    /// Abort any search and reset the session.
    pub fn restart(&mut self) {
        self.abort_active();
        self.session.lock().restart();
    }

    pub fn current(&self) -> Option<SearchId> {
        self.active.as_ref().map(|active| active.id)
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    fn abort_active(&mut self) -> Option<SearchId> {
        let active = self.active.take()?;
        if !active.handle.is_finished() {
            active.handle.abort();
            self.tracker.cancel(active.id);
            info!("Search {} aborted", active.id);
        }
        Some(active.id)
    }
}

impl Drop for SearchRunner {
    fn drop(&mut self) {
        self.abort_active();
    }
}

async fn run_search(
    search_id: SearchId,
    ticket: SearchTicket,
    filters: SearchFilters,
    session: Arc<Mutex<WizardSession>>,
    context: SearchContext,
) {
    for (index, phase) in context.plan.phases().iter().enumerate() {
        context.tracker.enter_phase(search_id, index, &phase.label);
        tokio::time::sleep(phase.duration).await;
    }
    finish_search(search_id, ticket, &filters, &session, &context);
}

fn finish_search(
    search_id: SearchId,
    ticket: SearchTicket,
    filters: &SearchFilters,
    session: &Mutex<WizardSession>,
    context: &SearchContext,
) {
    let found = select_entry(context.catalog.as_ref(), context.policy.as_ref(), filters)
        .and_then(|entry| entry.materialize(&context.synthesis, &mut *context.rng.lock()));

    let mut session = session.lock();
    match found {
        Ok(candidate) => {
            let candidate_id = candidate.id.clone();
            match session.complete_search(ticket, candidate) {
                Ok(_) => context.tracker.complete(search_id, candidate_id),
                Err(e) => {
                    warn!("Search {} finished after being superseded", search_id);
                    context.tracker.log(search_id, LogLevel::Warning, e.to_string());
                    context.tracker.cancel(search_id);
                }
            }
        }
        Err(e) => {
            if session.pending_search() == Some(ticket) {
                session.cancel_search();
            }
            let message = match e {
                CatalogError::Empty => "No systems available to search".to_string(),
                other => other.to_string(),
            };
            warn!("Search {} failed: {}", search_id, message);
            context.tracker.fail(search_id, message);
        }
    }
}
