//! Candidate records under review in a wizard session.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::light_curve::LightCurveSeries;
use crate::api::CandidateId;

/// A star/planet system flagged by a search.
///
/// Built from a catalog entry when a search completes; the light curve is
/// synthesized at that moment, so two searches landing on the same entry
/// carry different noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    /// System display name
    pub name: String,
    pub star_name: String,
    /// Spectral type, e.g. "M1V"
    pub stellar_type: String,
    pub stellar_radius_solar: f64,
    pub stellar_temperature_k: f64,
    pub distance_light_years: f64,
    pub orbital_period_days: f64,
    pub light_curve: LightCurveSeries,
    /// Detection confidence, 0-100
    pub ai_confidence_percent: f64,
    pub confirmed: bool,
    pub discovery_date: NaiveDate,
}

impl Candidate {
    pub fn star_size_label(&self) -> String {
        format!(
            "{:.2} R☉ ({})",
            self.stellar_radius_solar, self.stellar_type
        )
    }

    pub fn distance_label(&self) -> String {
        format!("{} light-years", self.distance_light_years.round() as i64)
    }

    pub fn temperature_label(&self) -> String {
        format!("{} K", self.stellar_temperature_k.round() as i64)
    }

    pub fn confidence_label(&self) -> String {
        format!("{:.1}%", self.ai_confidence_percent)
    }
}
