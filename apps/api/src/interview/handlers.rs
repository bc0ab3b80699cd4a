//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures_util::stream::{Stream, StreamExt};
use tracing::error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::events::interview_list_updates;
use crate::interview::form::InterviewForm;
use crate::interview::service;
use crate::models::interview::Interview;
use crate::session::Session;
use crate::state::AppState;

/// GET /api/v1/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Interview>>, AppError> {
    let interviews = state.store.list_interviews(&session.user_id).await?;
    Ok(Json(interviews))
}

/// POST /api/v1/interviews
pub async fn handle_create_interview(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<InterviewForm>,
) -> Result<(StatusCode, Json<Interview>), AppError> {
    let interview = service::create_interview(
        state.store.as_ref(),
        state.llm.as_ref(),
        &state.events,
        &session,
        &form,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<Interview>, AppError> {
    let interview = service::load_owned_interview(state.store.as_ref(), &session, id).await?;
    Ok(Json(interview))
}

/// PUT /api/v1/interviews/:id
///
/// Regenerates the question set; recording sessions for the old questions are dropped.
pub async fn handle_update_interview(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(form): Json<InterviewForm>,
) -> Result<Json<Interview>, AppError> {
    let interview = service::update_interview(
        state.store.as_ref(),
        state.llm.as_ref(),
        &state.events,
        &session,
        id,
        &form,
    )
    .await?;
    state.recordings.forget_interview(id).await;
    Ok(Json(interview))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service::delete_interview(state.store.as_ref(), &state.events, &session, id).await?;
    state.recordings.forget_interview(id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/interviews/stream
///
/// Server-sent events: an `interviews` event with the caller's full list, sent
/// on connect and after every change.
pub async fn handle_stream_interviews(
    State(state): State<AppState>,
    session: Session,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let updates = interview_list_updates(
        state.store.clone(),
        session.user_id.clone(),
        state.events.subscribe(),
    );

    let events = updates.map(move |result| match result {
        Ok(list) => Event::default().event("interviews").json_data(list),
        Err(e) => {
            error!("Failed to load interviews for user {}: {e:?}", session.user_id);
            Ok(Event::default()
                .event("error")
                .data("Failed to load interviews"))
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
