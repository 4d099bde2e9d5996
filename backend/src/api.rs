//! Public API surface for the backend.
//!
//! Identifier newtypes plus re-exports of the serializable view models, so
//! HTTP and library callers share one vocabulary.

pub use crate::models::{
    Answer, AnswerSet, Candidate, FilterInfo, FluxAxisRange, LightCurveSample, LightCurveSeries,
    SearchFilters,
};
pub use crate::services::search_tracker::{SearchJob, SearchLogEntry, SearchStatus};
pub use crate::services::system_view::{BackgroundStar, SystemScene};
pub use crate::synthesis::samples::{ReferenceCurve, SampleKind, SampleLibrary};
pub use crate::synthesis::tutorial::TutorialMarker;
pub use crate::synthesis::{PeriodogramPoint, TransitParameters};
pub use crate::wizard::{
    Assessment, AssessmentReceipt, Conclusion, Navigation, QuestionView, SummaryView,
    SystemData, WizardSnapshot, WizardStage,
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog identifier of a candidate system.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

/// Wizard session identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

/// Background search identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchId(pub Uuid);

impl CandidateId {
    pub fn new(value: impl Into<String>) -> Self {
        CandidateId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchId {
    pub fn new() -> Self {
        SearchId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for SearchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for SearchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        CandidateId::new(value)
    }
}

impl std::str::FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(SessionId)
    }
}

impl std::str::FromStr for SearchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(SearchId)
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
