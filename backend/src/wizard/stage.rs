//! Wizard stages and transition outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One view of the discovery wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStage {
    Entry,
    Search,
    Candidate,
    Questions,
    Summary,
}

impl WizardStage {
    /// Stages that cannot be shown without a selected candidate.
    pub fn requires_candidate(&self) -> bool {
        matches!(
            self,
            WizardStage::Candidate | WizardStage::Questions | WizardStage::Summary
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStage::Entry => "entry",
            WizardStage::Search => "search",
            WizardStage::Candidate => "candidate",
            WizardStage::Questions => "questions",
            WizardStage::Summary => "summary",
        }
    }
}

impl fmt::Display for WizardStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations that are only valid from some stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardAction {
    /// Direct navigation to a stage.
    Enter(WizardStage),
    BeginSearch,
    Investigate,
    Ignore,
    Answer,
    Advance,
    ViewQuestion,
    ViewSummary,
    SubmitAssessment,
}

impl fmt::Display for WizardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardAction::Enter(stage) => return write!(f, "enter {}", stage),
            WizardAction::BeginSearch => "begin search",
            WizardAction::Investigate => "investigate",
            WizardAction::Ignore => "ignore",
            WizardAction::Answer => "answer",
            WizardAction::Advance => "advance",
            WizardAction::ViewQuestion => "view question",
            WizardAction::ViewSummary => "view summary",
            WizardAction::SubmitAssessment => "submit assessment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    MissingCandidate,
}

/// Where a navigation request actually landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Navigation {
    Entered {
        stage: WizardStage,
    },
    Redirected {
        to: WizardStage,
        reason: RedirectReason,
    },
}

impl Navigation {
    pub fn stage(&self) -> WizardStage {
        match self {
            Navigation::Entered { stage } => *stage,
            Navigation::Redirected { to, .. } => *to,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Navigation::Redirected { .. })
    }
}

/// Result of a guarded view: the value, or the redirect the guard applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Guarded<T> {
    Ready(T),
    Redirected(Navigation),
}

impl<T> Guarded<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Guarded::Ready(value) => Some(value),
            Guarded::Redirected(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Guarded<U> {
        match self {
            Guarded::Ready(value) => Guarded::Ready(f(value)),
            Guarded::Redirected(nav) => Guarded::Redirected(nav),
        }
    }
}

/// Outcome of moving past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Advance {
    NextQuestion { index: usize },
    Concluded,
}
