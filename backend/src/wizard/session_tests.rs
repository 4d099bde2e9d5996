use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::api::CandidateId;
use crate::models::{Answer, Candidate, LightCurveSeries};
use crate::synthesis::{synthesize_transit, PeriodogramParams, TransitParameters};

fn candidate(id: &str) -> Candidate {
    let params = TransitParameters::new(3.9, 0.004, 0.3, 0.0, 100);
    let light_curve = synthesize_transit(&params, &mut StdRng::seed_from_u64(1)).unwrap();
    Candidate {
        id: CandidateId::new(id),
        name: format!("{} system", id),
        star_name: id.to_uppercase(),
        stellar_type: "M1V".to_string(),
        stellar_radius_solar: 0.52,
        stellar_temperature_k: 3755.0,
        distance_light_years: 582.0,
        orbital_period_days: 3.9,
        light_curve,
        ai_confidence_percent: 87.5,
        confirmed: true,
        discovery_date: NaiveDate::from_ymd_opt(2014, 4, 17).unwrap(),
    }
}

fn session_on_candidate(id: &str) -> WizardSession {
    let mut session = WizardSession::new();
    session.load();
    let ticket = session.begin_search().unwrap();
    session.complete_search(ticket, candidate(id)).unwrap();
    session
}

fn session_on_questions() -> WizardSession {
    let mut session = session_on_candidate("kepler-186f");
    session.investigate().unwrap();
    session
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(21)
}

#[test]
fn test_new_session_starts_at_entry() {
    let session = WizardSession::new();
    assert_eq!(session.stage(), WizardStage::Entry);
    assert!(session.candidate().is_none());
    assert!((0..4).all(|i| session.answer_at(i).is_none()));
}

#[test]
fn test_load_moves_to_search() {
    let mut session = WizardSession::new();
    let nav = session.load();
    assert_eq!(nav, Navigation::Entered { stage: WizardStage::Search });
    assert_eq!(session.stage(), WizardStage::Search);
}

#[test]
fn test_guarded_stages_redirect_without_candidate() {
    for target in [
        WizardStage::Candidate,
        WizardStage::Questions,
        WizardStage::Summary,
    ] {
        let mut session = WizardSession::new();
        session.load();
        let nav = session.enter(target).unwrap();
        assert_eq!(
            nav,
            Navigation::Redirected {
                to: WizardStage::Entry,
                reason: RedirectReason::MissingCandidate,
            }
        );
        assert_eq!(session.stage(), WizardStage::Entry);
    }
}

#[test]
fn test_guarded_views_redirect_without_candidate() {
    let mut session = WizardSession::new();
    assert!(matches!(session.candidate_view(), Guarded::Redirected(_)));
    assert!(matches!(
        session.question_view(&mut rng()).unwrap(),
        Guarded::Redirected(_)
    ));
    assert!(matches!(
        session.summary(&PeriodogramParams::default(), &mut rng()).unwrap(),
        Guarded::Redirected(_)
    ));
    assert!(session.investigate().unwrap().is_redirect());
    assert!(session.ignore().unwrap().is_redirect());
    assert!(matches!(
        session.submit_assessment(Assessment::Unsure).unwrap(),
        Guarded::Redirected(_)
    ));
    assert_eq!(session.stage(), WizardStage::Entry);
}

#[test]
fn test_completed_search_lands_on_candidate() {
    let session = session_on_candidate("toi-715b");
    assert_eq!(session.stage(), WizardStage::Candidate);
    assert_eq!(session.candidate().unwrap().id.as_str(), "toi-715b");
    assert!(session.pending_search().is_none());
}

#[test]
fn test_superseded_ticket_is_stale() {
    let mut session = WizardSession::new();
    session.load();
    let first = session.begin_search().unwrap();
    let second = session.begin_search().unwrap();
    assert!(second.epoch() > first.epoch());

    let err = session.complete_search(first, candidate("a")).unwrap_err();
    assert_eq!(err, WizardError::StaleSearch);
    assert!(session.candidate().is_none());
    assert_eq!(session.stage(), WizardStage::Search);

    session.complete_search(second, candidate("b")).unwrap();
    assert_eq!(session.candidate().unwrap().id.as_str(), "b");
}

#[test]
fn test_cancelled_search_cannot_complete() {
    let mut session = WizardSession::new();
    session.load();
    let ticket = session.begin_search().unwrap();
    assert_eq!(session.cancel_search(), Some(ticket));
    assert_eq!(
        session.complete_search(ticket, candidate("a")),
        Err(WizardError::StaleSearch)
    );
    assert!(session.candidate().is_none());
}

#[test]
fn test_begin_search_rejected_mid_questionnaire() {
    let mut session = session_on_questions();
    let err = session.begin_search().unwrap_err();
    assert_eq!(
        err,
        WizardError::InvalidTransition {
            from: WizardStage::Questions,
            action: WizardAction::BeginSearch,
        }
    );
    assert_eq!(session.stage(), WizardStage::Questions);
}

#[test]
fn test_ignore_drops_candidate() {
    let mut session = session_on_candidate("k2-18b");
    let nav = session.ignore().unwrap();
    assert_eq!(nav, Navigation::Entered { stage: WizardStage::Search });
    assert!(session.candidate().is_none());
}

#[test]
fn test_investigate_requires_candidate_stage() {
    let mut session = session_on_questions();
    let err = session.investigate().unwrap_err();
    assert!(matches!(
        err,
        WizardError::InvalidTransition {
            action: WizardAction::Investigate,
            ..
        }
    ));
}

#[test]
fn test_advance_requires_answer() {
    let mut session = session_on_questions();
    session.answer(Answer::Yes).unwrap();
    assert_eq!(
        session.advance().unwrap(),
        Advance::NextQuestion { index: 1 }
    );

    let err = session.advance().unwrap_err();
    assert_eq!(err, WizardError::Unanswered { index: 1 });
    assert_eq!(session.stage(), WizardStage::Questions);
    assert_eq!(session.question_index(), 1);
}

#[test]
fn test_full_questionnaire_concludes_on_summary() {
    let mut session = session_on_questions();
    for answer in [Answer::Yes, Answer::Yes, Answer::No, Answer::No] {
        session.answer(answer).unwrap();
        session.advance().unwrap();
    }
    assert_eq!(session.stage(), WizardStage::Summary);
    assert_eq!(session.answer_at(2), Some(Answer::No));

    let summary = session
        .summary(&PeriodogramParams::default(), &mut rng())
        .unwrap()
        .ready()
        .unwrap();
    assert_eq!(summary.conclusions.len(), 4);
    assert_eq!(summary.conclusions[0].text, "Periodic signal detected");
    assert_eq!(summary.conclusions[2].text, "Single transit event");
    assert_eq!(summary.system.star_size, "0.52 R☉ (M1V)");
    assert_eq!(summary.system.discovery_date, "2014-04-17");
    assert!(!summary.periodogram.is_empty());
}

#[test]
fn test_answers_reset_on_every_questions_entry() {
    let mut session = session_on_questions();
    session.answer(Answer::Yes).unwrap();
    session.advance().unwrap();
    session.answer(Answer::NotSure).unwrap();

    session.enter(WizardStage::Questions).unwrap();
    assert_eq!(session.question_index(), 0);
    assert!((0..4).all(|i| session.answer_at(i).is_none()));
}

#[test]
fn test_second_candidate_starts_with_blank_answers() {
    let mut session = session_on_questions();
    for _ in 0..4 {
        session.answer(Answer::Yes).unwrap();
        session.advance().unwrap();
    }
    assert_eq!(session.stage(), WizardStage::Summary);

    let ticket = session.begin_search().unwrap();
    session.complete_search(ticket, candidate("toi-700d")).unwrap();
    session.investigate().unwrap();

    assert_eq!(session.stage(), WizardStage::Questions);
    assert_eq!(session.answers().slots(), &[None, None, None, None]);
}

#[test]
fn test_set_answer_out_of_range() {
    let mut session = session_on_questions();
    let err = session.set_answer(4, Answer::Yes).unwrap_err();
    assert_eq!(err, WizardError::QuestionOutOfRange { index: 4, len: 4 });
    assert_eq!(session.answer_at(4), None);
}

#[test]
fn test_set_answer_outside_questions_rejected() {
    let mut session = session_on_candidate("kepler-186f");
    assert!(matches!(
        session.set_answer(0, Answer::Yes),
        Err(WizardError::InvalidTransition { .. })
    ));
}

#[test]
fn test_question_view_reflects_answer() {
    let mut session = session_on_questions();
    let view = session.question_view(&mut rng()).unwrap().ready().unwrap();
    assert_eq!(view.index, 0);
    assert!(!view.can_advance);
    assert_eq!(view.light_curve.len(), 120);

    session.answer(Answer::No).unwrap();
    let view = session.question_view(&mut rng()).unwrap().ready().unwrap();
    assert_eq!(view.answer, Some(Answer::No));
    assert!(view.can_advance);
    assert!(!view.is_last);
}

#[test]
fn test_submit_assessment_keeps_state() {
    let mut session = session_on_questions();
    for _ in 0..4 {
        session.answer(Answer::Yes).unwrap();
        session.advance().unwrap();
    }
    let receipt = session
        .submit_assessment(Assessment::LooksLikePlanet)
        .unwrap()
        .ready()
        .unwrap();
    assert_eq!(receipt.candidate_id.as_str(), "kepler-186f");
    assert_eq!(receipt.message, ASSESSMENT_THANKS);
    assert_eq!(session.stage(), WizardStage::Search);
    assert!(session.candidate().is_some());
    assert_eq!(session.answer_at(0), Some(Answer::Yes));
}

#[test]
fn test_submit_assessment_requires_summary() {
    let mut session = session_on_candidate("kepler-186f");
    assert!(matches!(
        session.submit_assessment(Assessment::Unsure),
        Err(WizardError::InvalidTransition {
            action: WizardAction::SubmitAssessment,
            ..
        })
    ));
    assert_eq!(session.stage(), WizardStage::Candidate);
}

#[test]
fn test_restart_tears_down() {
    let mut session = session_on_questions();
    session.answer(Answer::Yes).unwrap();
    let ticket_before = session.pending_search();
    assert!(ticket_before.is_none());

    session.restart();
    assert_eq!(session.stage(), WizardStage::Search);
    assert!(session.candidate().is_none());
    assert!(session.answer_at(0).is_none());

    let mut searching = WizardSession::new();
    searching.load();
    let ticket = searching.begin_search().unwrap();
    assert_eq!(searching.restart(), Some(ticket));
    assert!(searching.complete_search(ticket, candidate("x")).is_err());
}

#[test]
fn test_snapshot() {
    let mut session = session_on_questions();
    session.answer(Answer::NotSure).unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.stage, WizardStage::Questions);
    assert_eq!(snapshot.candidate_id, Some(CandidateId::new("kepler-186f")));
    assert_eq!(snapshot.answers[0], Some(Answer::NotSure));
    assert!(!snapshot.search_pending);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["stage"], "questions");
    assert_eq!(json["answers"][0], "not_sure");
}

#[test]
fn test_empty_light_curve_candidate_still_summarizes() {
    let mut session = WizardSession::new();
    session.load();
    let ticket = session.begin_search().unwrap();
    let mut bare = candidate("bare");
    bare.light_curve = LightCurveSeries::empty();
    session.complete_search(ticket, bare).unwrap();
    session.investigate().unwrap();
    for _ in 0..4 {
        session.answer(Answer::NotSure).unwrap();
        session.advance().unwrap();
    }
    let summary = session
        .summary(&PeriodogramParams::default(), &mut rng())
        .unwrap()
        .ready()
        .unwrap();
    assert!(summary.light_curve.is_empty());
}

#[test]
fn test_summary_unreachable_mid_questionnaire() {
    let mut session = session_on_questions();
    session.answer(Answer::Yes).unwrap();
    session.advance().unwrap();
    assert_eq!(
        session.advance().unwrap_err(),
        WizardError::Unanswered { index: 1 }
    );

    assert_eq!(
        session.enter(WizardStage::Summary).unwrap_err(),
        WizardError::InvalidTransition {
            from: WizardStage::Questions,
            action: WizardAction::Enter(WizardStage::Summary),
        }
    );
    assert_eq!(session.stage(), WizardStage::Questions);
    assert_eq!(session.question_index(), 1);
    assert_eq!(session.answer_at(0), Some(Answer::Yes));
    assert!(matches!(
        session.summary(&PeriodogramParams::default(), &mut rng()),
        Err(WizardError::InvalidTransition { .. })
    ));
}

#[test]
fn test_candidate_cannot_skip_to_summary() {
    let mut session = session_on_candidate("toi-715b");
    assert!(matches!(
        session.enter(WizardStage::Summary),
        Err(WizardError::InvalidTransition {
            from: WizardStage::Candidate,
            ..
        })
    ));
    assert_eq!(session.stage(), WizardStage::Candidate);

    assert_eq!(
        session.enter(WizardStage::Candidate).unwrap(),
        Navigation::Entered { stage: WizardStage::Candidate }
    );
}

#[test]
fn test_candidate_stage_only_reentered() {
    let mut session = session_on_questions();
    assert!(session.enter(WizardStage::Candidate).is_err());
    assert_eq!(session.stage(), WizardStage::Questions);
}

#[test]
fn test_concluded_questionnaire_allows_summary_reentry() {
    let mut session = session_on_questions();
    for _ in 0..4 {
        session.answer(Answer::Yes).unwrap();
        session.advance().unwrap();
    }
    session
        .submit_assessment(Assessment::LooksLikePlanet)
        .unwrap();
    assert_eq!(session.stage(), WizardStage::Search);

    assert_eq!(
        session.enter(WizardStage::Summary).unwrap(),
        Navigation::Entered { stage: WizardStage::Summary }
    );

    let ticket = session.begin_search().unwrap();
    session.complete_search(ticket, candidate("k2-18b")).unwrap();
    assert!(session.enter(WizardStage::Summary).is_err());
}
