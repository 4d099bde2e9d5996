//! The per-player wizard state machine.
//!
//! A [`WizardSession`] holds everything one reviewer has done so far: the
//! current stage, the selected candidate, the questionnaire answers and the
//! search filters. Every transition is a method returning either the outcome
//! or a [`WizardError`]; a rejected transition never mutates the session.
//!
//! Guarded stages (candidate, questions, summary) redirect to
//! [`WizardStage::Entry`] when no candidate is selected instead of failing.
//! The candidate stage is only reached through a completed search and the
//! summary only through a concluded questionnaire.

use chrono::Utc;
use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{WizardError, WizardResult};
use super::questions::{question_light_curve, QuestionView, QUESTIONS};
use super::stage::{Advance, Guarded, Navigation, RedirectReason, WizardAction, WizardStage};
use super::summary::{Assessment, AssessmentReceipt, SummaryView, ASSESSMENT_THANKS};
use crate::api::CandidateId;
use crate::models::{Answer, AnswerSet, Candidate, SearchFilters, QUESTION_COUNT};
use crate::synthesis::PeriodogramParams;

/// Token for the one search currently allowed to complete the session.
///
/// Each [`WizardSession::begin_search`] issues a ticket with a higher epoch;
/// earlier tickets are stale from that moment on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchTicket {
    epoch: u64,
}

impl SearchTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Serializable view of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardSnapshot {
    pub stage: WizardStage,
    pub candidate_id: Option<CandidateId>,
    pub candidate_name: Option<String>,
    pub question_index: usize,
    pub answers: Vec<Option<Answer>>,
    pub filters: SearchFilters,
    pub search_pending: bool,
}

#[derive(Debug, Clone)]
pub struct WizardSession {
    stage: WizardStage,
    candidate: Option<Candidate>,
    answers: AnswerSet,
    question_index: usize,
    /// Set when the last question was advanced past; cleared by a new
    /// questionnaire or a new candidate.
    concluded: bool,
    filters: SearchFilters,
    search_epoch: u64,
    pending_search: Option<SearchTicket>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    pub fn new() -> Self {
        Self {
            stage: WizardStage::Entry,
            candidate: None,
            answers: AnswerSet::new(QUESTION_COUNT),
            question_index: 0,
            concluded: false,
            filters: SearchFilters::default(),
            search_epoch: 0,
            pending_search: None,
        }
    }

    pub fn stage(&self) -> WizardStage {
        self.stage
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        self.candidate.as_ref()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn filters(&self) -> SearchFilters {
        self.filters
    }

    pub fn set_filters(&mut self, filters: SearchFilters) {
        self.filters = filters.clamped();
    }

    pub fn pending_search(&self) -> Option<SearchTicket> {
        self.pending_search
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            stage: self.stage,
            candidate_id: self.candidate.as_ref().map(|c| c.id.clone()),
            candidate_name: self.candidate.as_ref().map(|c| c.name.clone()),
            question_index: self.question_index,
            answers: self.answers.slots().to_vec(),
            filters: self.filters,
            search_pending: self.pending_search.is_some(),
        }
    }

    /// Application start: the entry view always hands over to search.
    pub fn load(&mut self) -> Navigation {
        self.stage = WizardStage::Search;
        Navigation::Entered {
            stage: WizardStage::Search,
        }
    }

    /// Navigate to `target`, applying the candidate guard.
    ///
    /// Entering [`WizardStage::Questions`] always starts a fresh
    /// questionnaire. [`WizardStage::Candidate`] can only be re-entered and
    /// [`WizardStage::Summary`] needs a concluded questionnaire; skipping
    /// ahead is an [`WizardError::InvalidTransition`].
    pub fn enter(&mut self, target: WizardStage) -> WizardResult<Navigation> {
        if target.requires_candidate() && self.candidate.is_none() {
            return Ok(self.redirect_missing_candidate(target));
        }
        let allowed = match target {
            WizardStage::Candidate => self.stage == WizardStage::Candidate,
            WizardStage::Summary => {
                self.stage == WizardStage::Summary
                    || (self.concluded && self.answers.is_complete())
            }
            WizardStage::Entry | WizardStage::Search | WizardStage::Questions => true,
        };
        if !allowed {
            return Err(WizardError::InvalidTransition {
                from: self.stage,
                action: WizardAction::Enter(target),
            });
        }
        Ok(self.move_to(target))
    }

    fn move_to(&mut self, target: WizardStage) -> Navigation {
        if target == WizardStage::Questions {
            self.answers.reset();
            self.question_index = 0;
            self.concluded = false;
        }
        if self.stage != target {
            info!("Wizard stage {} -> {}", self.stage, target);
        }
        self.stage = target;
        Navigation::Entered { stage: target }
    }

    fn redirect_missing_candidate(&mut self, attempted: WizardStage) -> Navigation {
        warn!(
            "No candidate selected for {} stage, redirecting to entry",
            attempted
        );
        self.stage = WizardStage::Entry;
        Navigation::Redirected {
            to: WizardStage::Entry,
            reason: RedirectReason::MissingCandidate,
        }
    }

    fn require_stage(&self, expected: WizardStage, action: WizardAction) -> WizardResult<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(WizardError::InvalidTransition {
                from: self.stage,
                action,
            })
        }
    }

    /// Start a new search, superseding any search still in flight.
    pub fn begin_search(&mut self) -> WizardResult<SearchTicket> {
        if !matches!(
            self.stage,
            WizardStage::Entry | WizardStage::Search | WizardStage::Summary
        ) {
            return Err(WizardError::InvalidTransition {
                from: self.stage,
                action: WizardAction::BeginSearch,
            });
        }
        self.search_epoch += 1;
        let ticket = SearchTicket {
            epoch: self.search_epoch,
        };
        if let Some(previous) = self.pending_search.replace(ticket) {
            info!("Search epoch {} superseded", previous.epoch);
        }
        self.stage = WizardStage::Search;
        info!("Search epoch {} started", ticket.epoch);
        Ok(ticket)
    }

    /// Deliver a search result. Only the current ticket is accepted.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        candidate: Candidate,
    ) -> WizardResult<Navigation> {
        if self.pending_search != Some(ticket) {
            warn!(
                "Dropping result of stale search epoch {} (current: {:?})",
                ticket.epoch,
                self.pending_search.map(|t| t.epoch)
            );
            return Err(WizardError::StaleSearch);
        }
        self.pending_search = None;
        info!("Search epoch {} found {}", ticket.epoch, candidate.name);
        self.candidate = Some(candidate);
        self.concluded = false;
        Ok(self.move_to(WizardStage::Candidate))
    }

    /// Forget the pending search, if any. Its ticket can no longer complete.
    pub fn cancel_search(&mut self) -> Option<SearchTicket> {
        let cancelled = self.pending_search.take();
        if let Some(ticket) = cancelled {
            info!("Search epoch {} cancelled", ticket.epoch);
        }
        cancelled
    }

    /// Candidate view, or the guard redirect.
    pub fn candidate_view(&mut self) -> Guarded<Candidate> {
        match self.candidate.clone() {
            Some(candidate) => Guarded::Ready(candidate),
            None => Guarded::Redirected(self.redirect_missing_candidate(WizardStage::Candidate)),
        }
    }

    /// Take a closer look: move on to the questionnaire.
    pub fn investigate(&mut self) -> WizardResult<Navigation> {
        if self.candidate.is_none() {
            return Ok(self.redirect_missing_candidate(WizardStage::Questions));
        }
        self.require_stage(WizardStage::Candidate, WizardAction::Investigate)?;
        Ok(self.move_to(WizardStage::Questions))
    }

    /// Dismiss the candidate and return to search.
    pub fn ignore(&mut self) -> WizardResult<Navigation> {
        if self.candidate.is_none() {
            return Ok(self.redirect_missing_candidate(WizardStage::Candidate));
        }
        self.require_stage(WizardStage::Candidate, WizardAction::Ignore)?;
        if let Some(dropped) = self.candidate.take() {
            info!("Candidate {} ignored", dropped.id);
        }
        self.concluded = false;
        Ok(self.move_to(WizardStage::Search))
    }

    /// Answer the current question.
    pub fn answer(&mut self, answer: Answer) -> WizardResult<()> {
        self.set_answer(self.question_index, answer)
    }

    pub fn set_answer(&mut self, index: usize, answer: Answer) -> WizardResult<()> {
        self.require_stage(WizardStage::Questions, WizardAction::Answer)?;
        if !self.answers.set(index, Some(answer)) {
            return Err(WizardError::QuestionOutOfRange {
                index,
                len: self.answers.len(),
            });
        }
        Ok(())
    }

    /// `None` for unanswered or out-of-range questions.
    pub fn answer_at(&self, index: usize) -> Option<Answer> {
        self.answers.get(index)
    }

    /// Move past the current question once it has an answer.
    pub fn advance(&mut self) -> WizardResult<Advance> {
        self.require_stage(WizardStage::Questions, WizardAction::Advance)?;
        let index = self.question_index;
        if !self.answers.is_answered(index) {
            return Err(WizardError::Unanswered { index });
        }
        if index + 1 >= self.answers.len() {
            info!("Questionnaire concluded");
            self.concluded = true;
            self.stage = WizardStage::Summary;
            return Ok(Advance::Concluded);
        }
        self.question_index = index + 1;
        Ok(Advance::NextQuestion {
            index: self.question_index,
        })
    }

    /// View of the current question with its illustrative light curve.
    pub fn question_view<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> WizardResult<Guarded<QuestionView>> {
        if self.candidate.is_none() {
            return Ok(Guarded::Redirected(
                self.redirect_missing_candidate(WizardStage::Questions),
            ));
        }
        self.require_stage(WizardStage::Questions, WizardAction::ViewQuestion)?;

        let index = self.question_index;
        let question = QUESTIONS[index];
        let answer = self.answers.get(index);
        Ok(Guarded::Ready(QuestionView {
            index,
            total: QUESTIONS.len(),
            prompt: question.prompt.to_string(),
            explanation: question.explanation.to_string(),
            answer,
            can_advance: answer.is_some(),
            is_last: index + 1 == QUESTIONS.len(),
            light_curve: question_light_curve(index, rng)?,
        }))
    }

    /// Summary view for the selected candidate.
    pub fn summary<R: Rng + ?Sized>(
        &mut self,
        periodogram: &PeriodogramParams,
        rng: &mut R,
    ) -> WizardResult<Guarded<SummaryView>> {
        if self.candidate.is_none() {
            return Ok(Guarded::Redirected(
                self.redirect_missing_candidate(WizardStage::Summary),
            ));
        }
        self.require_stage(WizardStage::Summary, WizardAction::ViewSummary)?;
        let candidate = self
            .candidate
            .as_ref()
            .ok_or(WizardError::MissingCandidate)?;
        let view = SummaryView::build(candidate, &self.answers, periodogram, rng)?;
        Ok(Guarded::Ready(view))
    }

    /// Record the final verdict and go back to search. Nothing is cleared;
    /// the next search replaces the candidate and the next questionnaire
    /// resets the answers.
    pub fn submit_assessment(
        &mut self,
        assessment: Assessment,
    ) -> WizardResult<Guarded<AssessmentReceipt>> {
        let candidate_id = match self.candidate.as_ref().map(|c| c.id.clone()) {
            Some(id) => id,
            None => {
                return Ok(Guarded::Redirected(
                    self.redirect_missing_candidate(WizardStage::Summary),
                ))
            }
        };
        self.require_stage(WizardStage::Summary, WizardAction::SubmitAssessment)?;
        info!("Assessment for {}: {}", candidate_id, assessment.label());
        self.move_to(WizardStage::Search);
        Ok(Guarded::Ready(AssessmentReceipt {
            candidate_id,
            assessment,
            message: ASSESSMENT_THANKS.to_string(),
            submitted_at: Utc::now(),
        }))
    }

    /// Tear down everything the session holds and go back to search.
    /// Returns the ticket of the search that was dropped, if any.
    pub fn restart(&mut self) -> Option<SearchTicket> {
        let dropped = self.pending_search.take();
        self.candidate = None;
        self.answers.reset();
        self.question_index = 0;
        self.concluded = false;
        self.stage = WizardStage::Search;
        info!("Wizard restarted");
        dropped
    }
}
