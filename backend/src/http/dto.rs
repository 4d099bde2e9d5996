//! Data Transfer Objects for the HTTP API.
//!
//! Most view models are re-exported from [`crate::api`] since they already
//! derive Serialize/Deserialize. The types here only shape requests and the
//! envelopes around those views.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    Answer, Assessment, AssessmentReceipt, Candidate, FilterInfo, FluxAxisRange, LightCurveSeries,
    Navigation, PeriodogramPoint, QuestionView, SearchFilters, SearchId, SearchJob, SessionId,
    SummaryView, SystemScene, WizardSnapshot, WizardStage,
};
use crate::catalog::CatalogEntry;
use crate::wizard::{Guarded, RedirectReason};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Number of systems available to search
    pub catalog_size: usize,
    pub active_sessions: usize,
}

/// Guarded view body: the view itself, or `{"redirect": "entry", ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GuardedResponse<T> {
    Redirect {
        redirect: WizardStage,
        reason: RedirectReason,
    },
    Ready(T),
}

impl<T> From<Guarded<T>> for GuardedResponse<T> {
    fn from(guarded: Guarded<T>) -> Self {
        match guarded {
            Guarded::Ready(value) => GuardedResponse::Ready(value),
            Guarded::Redirected(Navigation::Redirected { to, reason }) => {
                GuardedResponse::Redirect {
                    redirect: to,
                    reason,
                }
            }
            Guarded::Redirected(Navigation::Entered { stage }) => GuardedResponse::Redirect {
                redirect: stage,
                reason: RedirectReason::MissingCandidate,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreatedResponse {
    pub session_id: SessionId,
    pub snapshot: WizardSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateRequest {
    pub stage: WizardStage,
}

/// Raw slider positions; fractional values are rounded and clamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersRequest {
    pub distance: f64,
    pub temperature: f64,
    pub size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersResponse {
    pub filters: SearchFilters,
    pub distance: FilterInfo,
    pub temperature: FilterInfo,
    pub size: FilterInfo,
}

impl From<SearchFilters> for FiltersResponse {
    fn from(filters: SearchFilters) -> Self {
        Self {
            distance: filters.distance_info(),
            temperature: filters.temperature_info(),
            size: filters.size_info(),
            filters,
        }
    }
}

/// Response for search creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStartedResponse {
    pub search_id: SearchId,
    pub phases: Vec<String>,
    pub total_duration_ms: u64,
    /// Message about the operation
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCancelledResponse {
    /// The search that was aborted, if one was running
    pub search_id: Option<SearchId>,
    pub snapshot: WizardSnapshot,
}

/// Candidate card: the record plus its display labels and plot axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResponse {
    pub candidate: Candidate,
    pub star_size: String,
    pub distance: String,
    pub temperature: String,
    pub confidence: String,
    pub axis: FluxAxisRange,
}

impl From<Candidate> for CandidateResponse {
    fn from(candidate: Candidate) -> Self {
        Self {
            star_size: candidate.star_size_label(),
            distance: candidate.distance_label(),
            temperature: candidate.temperature_label(),
            confidence: candidate.confidence_label(),
            axis: FluxAxisRange::for_series(&candidate.light_curve),
            candidate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub answer: Answer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub index: usize,
    pub answer: Answer,
    pub answered_count: usize,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub assessment: Assessment,
}

/// Catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogListResponse {
    pub systems: Vec<CatalogEntry>,
    /// Total count
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightCurveResponse {
    pub light_curve: LightCurveSeries,
    pub axis: FluxAxisRange,
}

/// Query parameters for the periodogram endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodogramQuery {
    /// Orbital period to peak at, in days
    pub period: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodogramResponse {
    pub period: f64,
    pub points: Vec<PeriodogramPoint>,
}

/// Query parameters for the tutorial stream. Unset fields keep the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TutorialQuery {
    #[serde(default)]
    pub transit_depth: Option<f64>,
    #[serde(default)]
    pub period_seconds: Option<f64>,
    /// Milliseconds between frames
    #[serde(default)]
    pub frame_ms: Option<u64>,
}

/// Query parameters for the system scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemViewQuery {
    pub temperature_k: f64,
    pub radius_r_sun: f64,
    pub distance_ly: f64,
}
