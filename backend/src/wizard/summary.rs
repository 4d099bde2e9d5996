//! Summary view model and the final assessment.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::questions::QUESTIONS;
use crate::api::CandidateId;
use crate::models::{Answer, AnswerSet, Candidate, FluxAxisRange, LightCurveSeries};
use crate::synthesis::{synthesize_periodogram, PeriodogramParams, PeriodogramPoint, SynthesisResult};

pub const ASSESSMENT_THANKS: &str = "Thank you for your assessment! Returning to the search page.";

/// Display strings for the candidate system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemData {
    pub system_name: String,
    pub star_name: String,
    pub star_size: String,
    pub distance: String,
    pub temperature: String,
    pub discovery_date: String,
    pub ai_probability: String,
    pub temperature_k: f64,
    pub size_r_sun: f64,
    pub distance_ly: f64,
}

impl From<&Candidate> for SystemData {
    fn from(candidate: &Candidate) -> Self {
        Self {
            system_name: candidate.name.clone(),
            star_name: candidate.star_name.clone(),
            star_size: candidate.star_size_label(),
            distance: candidate.distance_label(),
            temperature: candidate.temperature_label(),
            discovery_date: candidate.discovery_date.format("%Y-%m-%d").to_string(),
            ai_probability: candidate.confidence_label(),
            temperature_k: candidate.stellar_temperature_k,
            size_r_sun: candidate.stellar_radius_solar,
            distance_ly: candidate.distance_light_years,
        }
    }
}

/// What one answer says about the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conclusion {
    pub question_index: usize,
    pub question: String,
    pub answer: String,
    pub text: String,
    /// True when the answer points toward a planet
    pub supports_planet: bool,
}

// (answer that supports a planet, text when it does, text otherwise)
const CONCLUSION_RULES: [(Answer, &str, &str); 4] = [
    (Answer::Yes, "Periodic signal detected", "No periodic signal"),
    (
        Answer::Yes,
        "Transit shape consistent with planet",
        "Irregular transit shape",
    ),
    (
        Answer::Yes,
        "Evidence of multiple planets",
        "Single transit event",
    ),
    (
        Answer::No,
        "No single-event artifacts",
        "Possible false positive",
    ),
];

/// Derive one conclusion per question. Unanswered questions take the
/// negative text.
pub fn conclusions(answers: &AnswerSet) -> Vec<Conclusion> {
    CONCLUSION_RULES
        .iter()
        .enumerate()
        .map(|(index, (expected, positive, negative))| {
            let supports_planet = answers.get(index) == Some(*expected);
            Conclusion {
                question_index: index,
                question: QUESTIONS[index].prompt.to_string(),
                answer: answers.label_at(index).to_string(),
                text: if supports_planet { positive } else { negative }.to_string(),
                supports_planet,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryView {
    pub candidate_id: CandidateId,
    pub system: SystemData,
    pub light_curve: LightCurveSeries,
    pub axis: FluxAxisRange,
    pub orbital_period_days: f64,
    pub periodogram: Vec<PeriodogramPoint>,
    pub conclusions: Vec<Conclusion>,
}

impl SummaryView {
    pub fn build<R: Rng + ?Sized>(
        candidate: &Candidate,
        answers: &AnswerSet,
        periodogram: &PeriodogramParams,
        rng: &mut R,
    ) -> SynthesisResult<Self> {
        Ok(Self {
            candidate_id: candidate.id.clone(),
            system: SystemData::from(candidate),
            light_curve: candidate.light_curve.clone(),
            axis: FluxAxisRange::for_series(&candidate.light_curve),
            orbital_period_days: candidate.orbital_period_days,
            periodogram: synthesize_periodogram(candidate.orbital_period_days, periodogram, rng)?,
            conclusions: conclusions(answers),
        })
    }
}

/// The reviewer's final call on a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    LooksLikePlanet,
    ProbablyNotPlanet,
    Unsure,
}

impl Assessment {
    pub fn label(&self) -> &'static str {
        match self {
            Assessment::LooksLikePlanet => "Looks like a planet",
            Assessment::ProbablyNotPlanet => "Probably not a planet",
            Assessment::Unsure => "Not sure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReceipt {
    pub candidate_id: CandidateId,
    pub assessment: Assessment,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}
