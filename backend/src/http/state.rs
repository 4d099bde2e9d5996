//! Application state for the HTTP server.

use log::{debug, info};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::api::SessionId;
use crate::catalog::{build_policy, CandidateCatalog, InMemoryCatalog, SelectionPolicy};
use crate::config::{AppConfig, SynthesisConfig};
use crate::services::{SearchContext, SearchPlan, SearchRunner, SearchTracker};
use crate::synthesis::{PeriodogramParams, TutorialCurve};
use crate::wizard::WizardSession;

/// One wizard session and the runner that owns its background search.
pub struct SessionEntry {
    pub session: Arc<Mutex<WizardSession>>,
    pub search: Mutex<SearchRunner>,
    last_seen: Mutex<Instant>,
}

impl SessionEntry {
    fn touch(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    fn idle_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*self.last_seen.lock())
    }
}

/// Live wizard sessions keyed by id.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<SessionEntry>>>>,
}

impl SessionStore {
    /// Create a session, already loaded onto the search stage.
    pub fn create(&self, tracker: &SearchTracker) -> (SessionId, Arc<SessionEntry>) {
        let id = SessionId::new();
        let mut wizard = WizardSession::new();
        wizard.load();
        let session = Arc::new(Mutex::new(wizard));
        let entry = Arc::new(SessionEntry {
            search: Mutex::new(SearchRunner::new(
                id,
                Arc::clone(&session),
                tracker.clone(),
            )),
            session,
            last_seen: Mutex::new(Instant::now()),
        });
        self.sessions.write().insert(id, Arc::clone(&entry));
        (id, entry)
    }

    /// Look up a session and mark it as active.
    pub fn get(&self, id: SessionId) -> Option<Arc<SessionEntry>> {
        let entry = self.sessions.read().get(&id).cloned()?;
        entry.touch();
        Some(entry)
    }

    /// Remove a session. Its search is aborted once the last handle drops.
    pub fn remove(&self, id: SessionId) -> Option<Arc<SessionEntry>> {
        self.sessions.write().remove(&id)
    }

    /// Remove every session idle for at least `max_idle` as of `now`.
    pub fn expire_idle(
        &self,
        max_idle: Duration,
        now: Instant,
    ) -> Vec<(SessionId, Arc<SessionEntry>)> {
        let mut sessions = self.sessions.write();
        let idle: Vec<SessionId> = sessions
            .iter()
            .filter(|(_, entry)| entry.idle_at(now) >= max_idle)
            .map(|(id, _)| *id)
            .collect();
        idle.into_iter()
            .filter_map(|id| sessions.remove(&id).map(|entry| (id, entry)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Catalog, selection policy, phase plan, tracker and random source
    pub search: SearchContext,
    pub periodogram: PeriodogramParams,
    pub tutorial: TutorialCurve,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CandidateCatalog>,
        policy: Arc<dyn SelectionPolicy>,
        plan: SearchPlan,
        synthesis: SynthesisConfig,
    ) -> Self {
        let rng = match synthesis.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            sessions: SessionStore::default(),
            search: SearchContext {
                catalog,
                policy,
                plan: Arc::new(plan),
                synthesis,
                tracker: SearchTracker::new(),
                rng: Arc::new(Mutex::new(rng)),
            },
            periodogram: PeriodogramParams::default(),
            tutorial: TutorialCurve::default(),
        }
    }

    /// Build state from configuration, loading the catalog file if one is set.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let catalog: Arc<dyn CandidateCatalog> = match &config.catalog.path {
            Some(path) => Arc::new(InMemoryCatalog::from_file(path)?),
            None => Arc::new(InMemoryCatalog::builtin()),
        };
        let policy = build_policy(
            config.selection_kind()?,
            config.synthesis.seed,
            config.search.candidate_id.as_deref(),
        );
        let plan = config.search.plan()?;
        Ok(Self::new(catalog, policy, plan, config.synthesis.clone()))
    }

    pub fn tracker(&self) -> &SearchTracker {
        &self.search.tracker
    }

    /// Drop sessions idle for at least `max_idle`, cancelling their searches.
    pub fn expire_idle_sessions(&self, max_idle: Duration) -> usize {
        let expired = self.sessions.expire_idle(max_idle, Instant::now());
        for (id, entry) in &expired {
            entry.search.lock().cancel();
            self.tracker().forget_session(*id);
            debug!("Session {} expired after {:?} idle", id, max_idle);
        }
        if !expired.is_empty() {
            info!(
                "Expired {} idle sessions, {} remain",
                expired.len(),
                self.sessions.len()
            );
        }
        expired.len()
    }

    /// Periodically expire idle sessions until the returned task is aborted.
    pub fn spawn_session_sweeper(&self, max_idle: Duration) -> JoinHandle<()> {
        let state = self.clone();
        let period = max_idle.clamp(Duration::from_secs(1), Duration::from_secs(60));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                state.expire_idle_sessions(max_idle);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            Arc::new(InMemoryCatalog::builtin()),
            build_policy(crate::catalog::SelectionKind::RoundRobin, None, None),
            SearchPlan::default(),
            SynthesisConfig::default(),
        )
    }

    #[test]
    fn test_expire_idle_keeps_recent_sessions() {
        let state = state();
        let (stale, _) = state.sessions.create(state.tracker());
        let (_fresh, fresh_entry) = state.sessions.create(state.tracker());

        let later = Instant::now() + Duration::from_secs(120);
        *fresh_entry.last_seen.lock() = later;

        let expired = state.sessions.expire_idle(Duration::from_secs(60), later);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].0, stale);
        assert!(state.sessions.get(stale).is_none());
        assert_eq!(state.sessions.len(), 1);
    }

    #[test]
    fn test_get_refreshes_activity() {
        let state = state();
        let (id, entry) = state.sessions.create(state.tracker());
        let stamp = *entry.last_seen.lock();
        std::thread::sleep(Duration::from_millis(2));

        state.sessions.get(id).unwrap();
        assert!(*entry.last_seen.lock() > stamp);
    }

    #[test]
    fn test_expire_idle_sessions_removes_everything_idle() {
        let state = state();
        state.sessions.create(state.tracker());
        state.sessions.create(state.tracker());
        assert_eq!(state.expire_idle_sessions(Duration::ZERO), 2);
        assert!(state.sessions.is_empty());
        assert_eq!(state.expire_idle_sessions(Duration::ZERO), 0);
    }
}
