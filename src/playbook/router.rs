use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{MeetingDraft, ProfileDraft, ProfileId, UpcomingDateDraft};
use super::guard::RecordViolation;
use super::period::Period;
use super::roster::RosterQuery;
use super::service::{PlaybookService, PlaybookServiceError};
use super::store::{RecordStore, StoreError};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PlaybookQuery {
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub top: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpcomingQuery {
    #[serde(default)]
    pub profile_id: Option<ProfileId>,
}

/// Router builder exposing the roster, player, and playbook endpoints.
pub fn playbook_router<S>(service: Arc<PlaybookService<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route("/api/v1/profiles", post(create_profile_handler::<S>))
        .route("/api/v1/profiles/:profile_id", get(player_handler::<S>))
        .route(
            "/api/v1/profiles/:profile_id/meetings",
            post(record_meeting_handler::<S>),
        )
        .route(
            "/api/v1/upcoming",
            get(upcoming_handler::<S>).post(schedule_handler::<S>),
        )
        .route("/api/v1/roster", get(roster_handler::<S>))
        .route("/api/v1/playbook", get(playbook_handler::<S>))
        .with_state(service)
}

fn error_response(error: PlaybookServiceError) -> Response {
    let status = match &error {
        PlaybookServiceError::Violation(RecordViolation::UnknownProfile(_))
        | PlaybookServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        PlaybookServiceError::Violation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PlaybookServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        PlaybookServiceError::Store(StoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn create_profile_handler<S>(
    State(service): State<Arc<PlaybookService<S>>>,
    axum::Json(draft): axum::Json<ProfileDraft>,
) -> Response
where
    S: RecordStore + 'static,
{
    match service.add_profile(draft, Utc::now()) {
        Ok(profile) => (StatusCode::CREATED, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn player_handler<S>(
    State(service): State<Arc<PlaybookService<S>>>,
    Path(profile_id): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
{
    match service.player(&ProfileId(profile_id), Utc::now()) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_meeting_handler<S>(
    State(service): State<Arc<PlaybookService<S>>>,
    Path(profile_id): Path<String>,
    axum::Json(draft): axum::Json<MeetingDraft>,
) -> Response
where
    S: RecordStore + 'static,
{
    match service.add_meeting(&ProfileId(profile_id), draft, Utc::now()) {
        Ok(meeting) => (StatusCode::CREATED, axum::Json(meeting)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn schedule_handler<S>(
    State(service): State<Arc<PlaybookService<S>>>,
    axum::Json(draft): axum::Json<UpcomingDateDraft>,
) -> Response
where
    S: RecordStore + 'static,
{
    match service.schedule(draft) {
        Ok(date) => (StatusCode::CREATED, axum::Json(date)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn upcoming_handler<S>(
    State(service): State<Arc<PlaybookService<S>>>,
    Query(query): Query<UpcomingQuery>,
) -> Response
where
    S: RecordStore + 'static,
{
    match service.upcoming(Utc::now(), query.profile_id.as_ref()) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn roster_handler<S>(
    State(service): State<Arc<PlaybookService<S>>>,
    Query(query): Query<RosterQuery>,
) -> Response
where
    S: RecordStore + 'static,
{
    match service.roster(&query) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn playbook_handler<S>(
    State(service): State<Arc<PlaybookService<S>>>,
    Query(query): Query<PlaybookQuery>,
) -> Response
where
    S: RecordStore + 'static,
{
    if query.top == Some(0) {
        let payload = json!({
            "error": "top must be at least 1",
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    match service.report(query.period, Utc::now(), query.top) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}
