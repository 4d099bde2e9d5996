//! Candidate selection policies.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::CatalogEntry;
use crate::api::CandidateId;
use crate::models::stellar::{distance_category_index, size_category_index, stellar_class_index};
use crate::models::SearchFilters;

/// Chooses which catalog entry a search lands on.
pub trait SelectionPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Index into `entries`, or `None` when nothing qualifies.
    fn select(&self, entries: &[CatalogEntry], filters: &SearchFilters) -> Option<usize>;
}

/// Uniformly random pick.
pub struct RandomSelection {
    rng: Mutex<StdRng>,
}

impl RandomSelection {
    /// Seeded for reproducible runs; `None` draws the seed from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl SelectionPolicy for RandomSelection {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select(&self, entries: &[CatalogEntry], _filters: &SearchFilters) -> Option<usize> {
        if entries.is_empty() {
            return None;
        }
        Some(self.rng.lock().gen_range(0..entries.len()))
    }
}

/// Walks the catalog in order, wrapping around.
#[derive(Default)]
pub struct RoundRobinSelection {
    next: AtomicUsize,
}

impl RoundRobinSelection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionPolicy for RoundRobinSelection {
    fn name(&self) -> &'static str {
        "round_robin"
    }

    fn select(&self, entries: &[CatalogEntry], _filters: &SearchFilters) -> Option<usize> {
        if entries.is_empty() {
            return None;
        }
        Some(self.next.fetch_add(1, Ordering::Relaxed) % entries.len())
    }
}

/// Always the same system.
pub struct ByIdSelection {
    id: CandidateId,
}

impl ByIdSelection {
    pub fn new(id: CandidateId) -> Self {
        Self { id }
    }
}

impl SelectionPolicy for ByIdSelection {
    fn name(&self) -> &'static str {
        "by_id"
    }

    fn select(&self, entries: &[CatalogEntry], _filters: &SearchFilters) -> Option<usize> {
        entries.iter().position(|entry| entry.id == self.id)
    }
}

/// The system whose star falls closest to the slider categories.
///
/// Distance is the sum of category-index differences on the three sliders;
/// ties go to the earlier entry.
#[derive(Default)]
pub struct NearestFilterSelection;

impl NearestFilterSelection {
    pub fn distance(entry: &CatalogEntry, filters: &SearchFilters) -> usize {
        let filters = filters.clamped();
        stellar_class_index(entry.stellar_temperature_k).abs_diff(filters.temperature_index)
            + size_category_index(entry.stellar_radius_solar).abs_diff(filters.size_index)
            + distance_category_index(entry.distance_light_years).abs_diff(filters.distance_index)
    }
}

impl SelectionPolicy for NearestFilterSelection {
    fn name(&self) -> &'static str {
        "nearest"
    }

    fn select(&self, entries: &[CatalogEntry], filters: &SearchFilters) -> Option<usize> {
        entries
            .iter()
            .enumerate()
            .min_by_key(|(index, entry)| (Self::distance(entry, filters), *index))
            .map(|(index, _)| index)
    }
}

/// Policy names accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Random,
    RoundRobin,
    ById,
    Nearest,
}

impl FromStr for SelectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "random" => Ok(Self::Random),
            "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            "by_id" | "fixed" => Ok(Self::ById),
            "nearest" | "nearest_filter" => Ok(Self::Nearest),
            _ => Err(format!("Unknown selection policy: {}", s)),
        }
    }
}

/// Build the configured policy. `ById` without an id falls back to random.
pub fn build_policy(
    kind: SelectionKind,
    seed: Option<u64>,
    candidate_id: Option<&str>,
) -> Arc<dyn SelectionPolicy> {
    match (kind, candidate_id) {
        (SelectionKind::Random, _) => Arc::new(RandomSelection::new(seed)),
        (SelectionKind::RoundRobin, _) => Arc::new(RoundRobinSelection::new()),
        (SelectionKind::ById, Some(id)) => Arc::new(ByIdSelection::new(CandidateId::new(id))),
        (SelectionKind::ById, None) => {
            log::warn!("by_id selection without candidate id, using random");
            Arc::new(RandomSelection::new(seed))
        }
        (SelectionKind::Nearest, _) => Arc::new(NearestFilterSelection),
    }
}
