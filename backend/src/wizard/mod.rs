//! Discovery wizard: entry → search → candidate → questions → summary.

pub mod error;
pub mod questions;
pub mod session;
pub mod stage;
pub mod summary;

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;

pub use error::{WizardError, WizardResult};
pub use questions::{question_light_curve, Question, QuestionView, QUESTIONS};
pub use session::{SearchTicket, WizardSession, WizardSnapshot};
pub use stage::{Advance, Guarded, Navigation, RedirectReason, WizardAction, WizardStage};
pub use summary::{
    conclusions, Assessment, AssessmentReceipt, Conclusion, SummaryView, SystemData,
    ASSESSMENT_THANKS,
};
