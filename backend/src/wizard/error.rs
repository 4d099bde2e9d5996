//! Wizard error types.

use thiserror::Error;

use super::stage::{WizardAction, WizardStage};
use crate::synthesis::SynthesisError;

pub type WizardResult<T> = Result<T, WizardError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    /// Raised internally by guarded operations; sessions turn it into a
    /// redirect before it reaches a caller.
    #[error("no candidate selected")]
    MissingCandidate,

    #[error("cannot {action} from the {from} stage")]
    InvalidTransition {
        from: WizardStage,
        action: WizardAction,
    },

    #[error("question {index} has not been answered")]
    Unanswered { index: usize },

    #[error("question {index} out of range (0..{len})")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("search result arrived for a superseded search")]
    StaleSearch,

    #[error("synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
}
