#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use parking_lot::Mutex as SessionMutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use transit_quest::api::SessionId;
use transit_quest::catalog::{CandidateCatalog, InMemoryCatalog, RoundRobinSelection};
use transit_quest::config::SynthesisConfig;
use transit_quest::services::{SearchContext, SearchPhase, SearchPlan, SearchRunner, SearchTracker};
use transit_quest::wizard::WizardSession;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily set or removed.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment across parallel tests.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    previous: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let previous = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();
        for (key, value) in changes {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
        Self { previous }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            match value {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}

/// Three short phases, 30 ms in total.
pub fn fast_plan() -> SearchPlan {
    SearchPlan::new(vec![
        SearchPhase::new("Connecting to database...", Duration::from_millis(10)),
        SearchPhase::new("Fetching star data...", Duration::from_millis(10)),
        SearchPhase::new("Updating results...", Duration::from_millis(10)),
    ])
    .unwrap()
}

/// Search context over `catalog` with round-robin selection and a seeded rng.
pub fn search_context(catalog: Arc<dyn CandidateCatalog>, plan: SearchPlan) -> SearchContext {
    SearchContext {
        catalog,
        policy: Arc::new(RoundRobinSelection::new()),
        plan: Arc::new(plan),
        synthesis: SynthesisConfig {
            seed: Some(7),
            ..SynthesisConfig::default()
        },
        tracker: SearchTracker::new(),
        rng: Arc::new(SessionMutex::new(StdRng::seed_from_u64(7))),
    }
}

pub fn builtin_context(plan: SearchPlan) -> SearchContext {
    search_context(Arc::new(InMemoryCatalog::builtin()), plan)
}

/// A freshly loaded session plus its runner.
pub fn runner(context: &SearchContext) -> (Arc<SessionMutex<WizardSession>>, SearchRunner) {
    let mut wizard = WizardSession::new();
    wizard.load();
    let session = Arc::new(SessionMutex::new(wizard));
    let runner = SearchRunner::new(SessionId::new(), Arc::clone(&session), context.tracker.clone());
    (session, runner)
}
