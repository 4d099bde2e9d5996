//! Candidate catalog.
//!
//! Catalog entries describe a star system and the transit it shows. A
//! [`Candidate`] is materialized from an entry when a search completes, at
//! which point its light curve is synthesized.

pub mod selection;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::api::CandidateId;
use crate::config::SynthesisConfig;
use crate::models::{Candidate, SearchFilters};
use crate::synthesis::{synthesize_transit, DipProfile, SynthesisError, TransitParameters};

pub use selection::{
    build_policy, ByIdSelection, NearestFilterSelection, RandomSelection, RoundRobinSelection,
    SelectionKind, SelectionPolicy,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is empty")]
    Empty,
    #[error("catalog entry not found: {0}")]
    NotFound(String),
    #[error("failed to parse catalog: {0}")]
    Parse(String),
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog entry has invalid transit: {0}")]
    Synthesis(#[from] SynthesisError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Transit shape of a catalog system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitShape {
    pub period_days: f64,
    pub transit_depth: f64,
    pub transit_duration_days: f64,
    #[serde(default)]
    pub profile: DipProfile,
}

impl TransitShape {
    pub fn parameters(&self, synthesis: &SynthesisConfig) -> TransitParameters {
        TransitParameters::new(
            self.period_days,
            self.transit_depth,
            self.transit_duration_days,
            synthesis.noise_level,
            synthesis.num_points,
        )
        .with_span(synthesis.span_multiplier)
        .with_profile(self.profile)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: CandidateId,
    pub name: String,
    pub star_name: String,
    pub stellar_type: String,
    pub stellar_radius_solar: f64,
    pub stellar_temperature_k: f64,
    pub distance_light_years: f64,
    pub ai_confidence_percent: f64,
    #[serde(default)]
    pub confirmed: bool,
    pub discovery_date: NaiveDate,
    pub transit: TransitShape,
}

impl CatalogEntry {
    /// Build a candidate with a freshly synthesized light curve.
    pub fn materialize<R: Rng + ?Sized>(
        &self,
        synthesis: &SynthesisConfig,
        rng: &mut R,
    ) -> CatalogResult<Candidate> {
        let light_curve = synthesize_transit(&self.transit.parameters(synthesis), rng)?;
        Ok(Candidate {
            id: self.id.clone(),
            name: self.name.clone(),
            star_name: self.star_name.clone(),
            stellar_type: self.stellar_type.clone(),
            stellar_radius_solar: self.stellar_radius_solar,
            stellar_temperature_k: self.stellar_temperature_k,
            distance_light_years: self.distance_light_years,
            orbital_period_days: self.transit.period_days,
            light_curve,
            ai_confidence_percent: self.ai_confidence_percent,
            confirmed: self.confirmed,
            discovery_date: self.discovery_date,
        })
    }

    fn validate(&self) -> CatalogResult<()> {
        self.transit
            .parameters(&SynthesisConfig::default())
            .validate()?;
        if !(0.0..=100.0).contains(&self.ai_confidence_percent) {
            return Err(CatalogError::Parse(format!(
                "{}: ai_confidence_percent must be in [0, 100]",
                self.id
            )));
        }
        Ok(())
    }
}

/// Read access to candidate systems.
pub trait CandidateCatalog: Send + Sync {
    fn entries(&self) -> &[CatalogEntry];

    fn get(&self, id: &CandidateId) -> Option<&CatalogEntry> {
        self.entries().iter().find(|entry| &entry.id == id)
    }

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Pick an entry with `policy`, reporting an empty catalog or a policy miss.
pub fn select_entry<'a>(
    catalog: &'a dyn CandidateCatalog,
    policy: &dyn SelectionPolicy,
    filters: &SearchFilters,
) -> CatalogResult<&'a CatalogEntry> {
    let entries = catalog.entries();
    if entries.is_empty() {
        return Err(CatalogError::Empty);
    }
    policy
        .select(entries, filters)
        .and_then(|index| entries.get(index))
        .ok_or_else(|| {
            CatalogError::NotFound(format!("no entry matched the {} policy", policy.name()))
        })
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    systems: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entries: Vec<CatalogEntry>,
}

impl InMemoryCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> CatalogResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.id.clone()) {
                return Err(CatalogError::Parse(format!("duplicate id {}", entry.id)));
            }
        }
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `[[systems]]` tables from TOML.
    pub fn from_toml_str(content: &str) -> CatalogResult<Self> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(file.systems)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_toml_str(&content)?;
        log::info!(
            "Loaded {} catalog systems from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// The six systems shipped with the game.
    pub fn builtin() -> Self {
        Self {
            entries: builtin_entries(),
        }
    }
}

impl CandidateCatalog for InMemoryCatalog {
    fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    name: &str,
    star_name: &str,
    stellar_type: &str,
    radius: f64,
    temperature: f64,
    distance: f64,
    confidence: f64,
    discovered: (i32, u32, u32),
    transit: (f64, f64, f64),
) -> Option<CatalogEntry> {
    let (year, month, day) = discovered;
    let (period_days, transit_depth, transit_duration_days) = transit;
    Some(CatalogEntry {
        id: CandidateId::new(id),
        name: name.to_string(),
        star_name: star_name.to_string(),
        stellar_type: stellar_type.to_string(),
        stellar_radius_solar: radius,
        stellar_temperature_k: temperature,
        distance_light_years: distance,
        ai_confidence_percent: confidence,
        confirmed: true,
        discovery_date: NaiveDate::from_ymd_opt(year, month, day)?,
        transit: TransitShape {
            period_days,
            transit_depth,
            transit_duration_days,
            profile: DipProfile::Cosine,
        },
    })
}

// Transit durations are stretched so each dip spans several samples at the
// default resolution.
fn builtin_entries() -> Vec<CatalogEntry> {
    [
        entry(
            "kepler-186f",
            "Kepler-186 f",
            "Kepler-186",
            "M1V",
            0.52,
            3755.0,
            582.0,
            87.0,
            (2014, 4, 17),
            (129.9, 0.0042, 7.8),
        ),
        entry(
            "toi-715b",
            "TOI-715 b",
            "TOI-715",
            "M4V",
            0.24,
            3075.0,
            137.0,
            91.2,
            (2024, 1, 31),
            (19.288, 0.0038, 1.2),
        ),
        entry(
            "trappist-1e",
            "TRAPPIST-1 e",
            "TRAPPIST-1",
            "M8V",
            0.119,
            2566.0,
            40.7,
            94.6,
            (2017, 2, 22),
            (6.099, 0.0051, 0.37),
        ),
        entry(
            "lhs-1140b",
            "LHS 1140 b",
            "LHS 1140",
            "M4.5V",
            0.21,
            3216.0,
            48.8,
            89.3,
            (2017, 4, 19),
            (24.737, 0.006, 1.5),
        ),
        entry(
            "toi-700d",
            "TOI-700 d",
            "TOI-700",
            "M2V",
            0.42,
            3480.0,
            101.4,
            84.1,
            (2020, 1, 6),
            (37.426, 0.003, 2.2),
        ),
        entry(
            "k2-18b",
            "K2-18 b",
            "K2-18",
            "M2.5V",
            0.41,
            3457.0,
            124.0,
            82.7,
            (2015, 12, 18),
            (32.94, 0.0029, 2.0),
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
