//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint. Session handlers lock the
//! wizard only for the duration of one synchronous call; nothing holds a
//! lock across an `.await`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use super::dto::{
    AnswerRequest, AnswerResponse, AssessmentReceipt, AssessmentRequest, CandidateResponse,
    CatalogListResponse, FiltersRequest, FiltersResponse, GuardedResponse, HealthResponse,
    LightCurveResponse, NavigateRequest, Navigation, PeriodogramQuery, PeriodogramResponse,
    QuestionView, SearchCancelledResponse, SearchJob, SearchStartedResponse,
    SessionCreatedResponse, SummaryView, SystemScene, SystemViewQuery, TutorialQuery,
    WizardSnapshot,
};
use super::error::AppError;
use super::state::{AppState, SessionEntry};
use crate::api::{SearchId, SessionId};
use crate::models::{FluxAxisRange, SearchFilters};
use crate::services::{system_scene, SearchStatus, TutorialAnimation, DEFAULT_FRAME_INTERVAL};
use crate::synthesis::{
    synthesize_periodogram, synthesize_transit, SampleLibrary, TransitParameters, TutorialCurve,
};
use crate::wizard::Advance;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Upper bound on synthesized series length accepted from clients.
const MAX_REQUEST_POINTS: usize = 100_000;

fn session_entry(state: &AppState, id: SessionId) -> Result<Arc<SessionEntry>, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        catalog_size: state.search.catalog.len(),
        active_sessions: state.sessions.len(),
    }))
}

// =============================================================================
// Sessions
// =============================================================================

/// POST /v1/sessions
///
/// Create a wizard session. It starts on the search stage.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), AppError> {
    let (session_id, entry) = state.sessions.create(state.tracker());
    let snapshot = entry.session.lock().snapshot();
    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id,
            snapshot,
        }),
    ))
}

/// GET /v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> HandlerResult<WizardSnapshot> {
    let entry = session_entry(&state, id)?;
    let snapshot = entry.session.lock().snapshot();
    Ok(Json(snapshot))
}

/// DELETE /v1/sessions/{id}
///
/// Tear the session down, aborting any search it has running.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, AppError> {
    let entry = state
        .sessions
        .remove(id)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
    entry.search.lock().cancel();
    state.tracker().forget_session(id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/sessions/{id}/navigate
pub async fn navigate(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<NavigateRequest>,
) -> HandlerResult<Navigation> {
    let entry = session_entry(&state, id)?;
    let navigation = entry.session.lock().enter(request.stage)?;
    Ok(Json(navigation))
}

/// PUT /v1/sessions/{id}/filters
pub async fn update_filters(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<FiltersRequest>,
) -> HandlerResult<FiltersResponse> {
    let entry = session_entry(&state, id)?;
    let filters = SearchFilters::from_sliders(request.distance, request.temperature, request.size);
    let mut session = entry.session.lock();
    session.set_filters(filters);
    Ok(Json(session.filters().into()))
}

/// POST /v1/sessions/{id}/restart
pub async fn restart_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> HandlerResult<WizardSnapshot> {
    let entry = session_entry(&state, id)?;
    entry.search.lock().restart();
    let snapshot = entry.session.lock().snapshot();
    Ok(Json(snapshot))
}

// =============================================================================
// Search
// =============================================================================

/// POST /v1/sessions/{id}/search
///
/// Start a background search. Returns a search ID for tracking progress.
pub async fn start_search(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<(StatusCode, Json<SearchStartedResponse>), AppError> {
    let entry = session_entry(&state, id)?;
    let search_id = entry.search.lock().start(&state.search)?;
    let plan = &state.search.plan;

    Ok((
        StatusCode::ACCEPTED,
        Json(SearchStartedResponse {
            search_id,
            phases: plan.phases().iter().map(|p| p.label.clone()).collect(),
            total_duration_ms: plan.total_duration().as_millis() as u64,
            message: format!(
                "Search started. Track progress at /v1/searches/{}/events",
                search_id
            ),
        }),
    ))
}

/// DELETE /v1/sessions/{id}/search
pub async fn cancel_search(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> HandlerResult<SearchCancelledResponse> {
    let entry = session_entry(&state, id)?;
    let search_id = entry.search.lock().cancel();
    let snapshot = entry.session.lock().snapshot();
    Ok(Json(SearchCancelledResponse {
        search_id,
        snapshot,
    }))
}

/// GET /v1/searches/{search_id}
pub async fn get_search(
    State(state): State<AppState>,
    Path(search_id): Path<SearchId>,
) -> HandlerResult<SearchJob> {
    let job = state
        .tracker()
        .get(search_id)
        .ok_or_else(|| AppError::NotFound(format!("Search {} not found", search_id)))?;
    Ok(Json(job))
}

/// GET /v1/searches/{search_id}/events
///
/// Stream search phase labels via Server-Sent Events (SSE), followed by a
/// final `complete` event carrying the status and candidate.
pub async fn stream_search_events(
    State(state): State<AppState>,
    Path(search_id): Path<SearchId>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if state.tracker().get(search_id).is_none() {
        return Err(AppError::NotFound(format!("Search {} not found", search_id)));
    }

    let tracker = state.tracker().clone();
    let stream = async_stream::stream! {
        let mut sent = 0;
        loop {
            let logs = tracker.logs(search_id);
            for entry in logs.iter().skip(sent) {
                let data = serde_json::to_string(entry).unwrap_or_default();
                yield Ok(Event::default().event("log").data(data));
            }
            sent = logs.len();

            match tracker.get(search_id) {
                Some(job) if job.status != SearchStatus::Running => {
                    let final_event = serde_json::json!({
                        "status": job.status,
                        "candidate_id": job.candidate_id,
                    });
                    yield Ok(Event::default()
                        .event("complete")
                        .data(serde_json::to_string(&final_event).unwrap_or_default()));
                    break;
                }
                Some(_) => {}
                None => break,
            }

            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}

// =============================================================================
// Candidate & questionnaire
// =============================================================================

/// GET /v1/sessions/{id}/candidate
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> HandlerResult<GuardedResponse<CandidateResponse>> {
    let entry = session_entry(&state, id)?;
    let view = entry.session.lock().candidate_view();
    Ok(Json(view.map(CandidateResponse::from).into()))
}

/// POST /v1/sessions/{id}/investigate
pub async fn investigate(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> HandlerResult<Navigation> {
    let entry = session_entry(&state, id)?;
    let navigation = entry.session.lock().investigate()?;
    Ok(Json(navigation))
}

/// POST /v1/sessions/{id}/ignore
pub async fn ignore(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> HandlerResult<Navigation> {
    let entry = session_entry(&state, id)?;
    let navigation = entry.session.lock().ignore()?;
    Ok(Json(navigation))
}

/// GET /v1/sessions/{id}/questions
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> HandlerResult<GuardedResponse<QuestionView>> {
    let entry = session_entry(&state, id)?;
    let mut session = entry.session.lock();
    let view = session.question_view(&mut *state.search.rng.lock())?;
    Ok(Json(view.into()))
}

/// PUT /v1/sessions/{id}/answers/{index}
pub async fn set_answer(
    State(state): State<AppState>,
    Path((id, index)): Path<(SessionId, usize)>,
    Json(request): Json<AnswerRequest>,
) -> HandlerResult<AnswerResponse> {
    let entry = session_entry(&state, id)?;
    let mut session = entry.session.lock();
    session.set_answer(index, request.answer)?;
    Ok(Json(AnswerResponse {
        index,
        answer: request.answer,
        answered_count: session.answers().answered_count(),
        complete: session.answers().is_complete(),
    }))
}

/// POST /v1/sessions/{id}/advance
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> HandlerResult<Advance> {
    let entry = session_entry(&state, id)?;
    let outcome = entry.session.lock().advance()?;
    Ok(Json(outcome))
}

/// GET /v1/sessions/{id}/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> HandlerResult<GuardedResponse<SummaryView>> {
    let entry = session_entry(&state, id)?;
    let mut session = entry.session.lock();
    let view = session.summary(&state.periodogram, &mut *state.search.rng.lock())?;
    Ok(Json(view.into()))
}

/// POST /v1/sessions/{id}/assessment
pub async fn submit_assessment(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<AssessmentRequest>,
) -> HandlerResult<GuardedResponse<AssessmentReceipt>> {
    let entry = session_entry(&state, id)?;
    let receipt = entry.session.lock().submit_assessment(request.assessment)?;
    Ok(Json(receipt.into()))
}

// =============================================================================
// Catalog & synthesis
// =============================================================================

/// GET /v1/catalog
pub async fn list_catalog(State(state): State<AppState>) -> HandlerResult<CatalogListResponse> {
    let systems = state.search.catalog.entries().to_vec();
    let total = systems.len();
    Ok(Json(CatalogListResponse { systems, total }))
}

/// POST /v1/light-curves/transit
pub async fn synthesize_light_curve(
    State(state): State<AppState>,
    Json(params): Json<TransitParameters>,
) -> HandlerResult<LightCurveResponse> {
    if params.num_points > MAX_REQUEST_POINTS {
        return Err(AppError::BadRequest(format!(
            "num_points must be at most {}",
            MAX_REQUEST_POINTS
        )));
    }
    let light_curve = synthesize_transit(&params, &mut *state.search.rng.lock())?;
    let axis = FluxAxisRange::for_series(&light_curve);
    Ok(Json(LightCurveResponse { light_curve, axis }))
}

/// GET /v1/light-curves/samples
pub async fn get_samples(State(state): State<AppState>) -> HandlerResult<SampleLibrary> {
    let library = SampleLibrary::generate(&mut *state.search.rng.lock())?;
    Ok(Json(library))
}

/// GET /v1/periodogram?period=
pub async fn get_periodogram(
    State(state): State<AppState>,
    Query(query): Query<PeriodogramQuery>,
) -> HandlerResult<PeriodogramResponse> {
    let points =
        synthesize_periodogram(query.period, &state.periodogram, &mut *state.search.rng.lock())?;
    Ok(Json(PeriodogramResponse {
        period: query.period,
        points,
    }))
}

/// GET /v1/system-view
pub async fn get_system_view(
    State(state): State<AppState>,
    Query(query): Query<SystemViewQuery>,
) -> HandlerResult<SystemScene> {
    let scene = system_scene(
        query.temperature_k,
        query.radius_r_sun,
        query.distance_ly,
        &mut *state.search.rng.lock(),
    );
    Ok(Json(scene))
}

// =============================================================================
// Tutorial
// =============================================================================

fn tutorial_curve(state: &AppState, query: &TutorialQuery) -> TutorialCurve {
    TutorialCurve {
        transit_depth: query.transit_depth.unwrap_or(state.tutorial.transit_depth),
        period_seconds: query.period_seconds.unwrap_or(state.tutorial.period_seconds),
        ..state.tutorial
    }
}

/// GET /v1/tutorial
///
/// The full tutorial period, for drawing under the animated marker.
pub async fn get_tutorial_curve(
    State(state): State<AppState>,
    Query(query): Query<TutorialQuery>,
) -> HandlerResult<LightCurveResponse> {
    let light_curve = tutorial_curve(&state, &query).curve()?;
    let axis = FluxAxisRange::for_series(&light_curve);
    Ok(Json(LightCurveResponse { light_curve, axis }))
}

/// GET /v1/tutorial/stream
///
/// Stream marker frames via SSE. The animation task lives as long as the
/// client stays connected.
pub async fn stream_tutorial(
    State(state): State<AppState>,
    Query(query): Query<TutorialQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let frame_interval = query
        .frame_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_FRAME_INTERVAL);
    let animation = TutorialAnimation::start(tutorial_curve(&state, &query), frame_interval)?;
    let mut frames = animation.subscribe();

    let stream = async_stream::stream! {
        let _animation = animation;
        loop {
            let marker = *frames.borrow_and_update();
            let data = serde_json::to_string(&marker).unwrap_or_default();
            yield Ok(Event::default().event("marker").data(data));
            if frames.changed().await.is_err() {
                break;
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}
