//! Axum route handlers for recording sessions and feedback reports.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::answer::feedback::FeedbackOutcome;
use crate::answer::recording::{RecordingKey, RecordingSnapshot};
use crate::answer::report::{build_feedback_report, FeedbackReport};
use crate::answer::service::{save_answer, stop_and_score};
use crate::answer::transcript::SpeechFragment;
use crate::errors::AppError;
use crate::interview::service::load_question;
use crate::models::answer::UserAnswer;
use crate::models::interview::QuestionAnswer;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TranscriptUpdate {
    pub results: Vec<SpeechFragment>,
}

/// Resolves the question and the session key for a recording route.
async fn resolve(
    state: &AppState,
    session: &Session,
    interview_id: Uuid,
    index: usize,
) -> Result<(RecordingKey, QuestionAnswer), AppError> {
    let question = load_question(state.store.as_ref(), session, interview_id, index).await?;
    let key = RecordingKey {
        user_id: session.user_id.clone(),
        interview_id,
        question_index: index,
    };
    Ok((key, question))
}

/// GET /api/v1/interviews/:id/questions/:index/recording
pub async fn handle_get_recording(
    State(state): State<AppState>,
    session: Session,
    Path((interview_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<RecordingSnapshot>, AppError> {
    let (key, question) = resolve(&state, &session, interview_id, index).await?;
    let snapshot = state
        .recordings
        .with_session(&key, &question, |s| s.snapshot())
        .await;
    Ok(Json(snapshot))
}

/// POST /api/v1/interviews/:id/questions/:index/recording/start
pub async fn handle_start_recording(
    State(state): State<AppState>,
    session: Session,
    Path((interview_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<RecordingSnapshot>, AppError> {
    let (key, question) = resolve(&state, &session, interview_id, index).await?;
    let snapshot = state
        .recordings
        .with_session(&key, &question, |s| s.start().map(|_| s.snapshot()))
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/interviews/:id/questions/:index/recording/transcript
///
/// Body carries the full latest fragment list, not a delta.
pub async fn handle_update_transcript(
    State(state): State<AppState>,
    session: Session,
    Path((interview_id, index)): Path<(Uuid, usize)>,
    Json(update): Json<TranscriptUpdate>,
) -> Result<Json<RecordingSnapshot>, AppError> {
    let (key, question) = resolve(&state, &session, interview_id, index).await?;
    let snapshot = state
        .recordings
        .with_session(&key, &question, |s| {
            s.update_transcript(update.results).map(|_| s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/interviews/:id/questions/:index/recording/stop
pub async fn handle_stop_recording(
    State(state): State<AppState>,
    session: Session,
    Path((interview_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<FeedbackOutcome>, AppError> {
    let (key, question) = resolve(&state, &session, interview_id, index).await?;
    let outcome = stop_and_score(&state.recordings, state.llm.as_ref(), &key, &question).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/interviews/:id/questions/:index/recording/rerecord
pub async fn handle_rerecord(
    State(state): State<AppState>,
    session: Session,
    Path((interview_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<RecordingSnapshot>, AppError> {
    let (key, question) = resolve(&state, &session, interview_id, index).await?;
    let snapshot = state
        .recordings
        .with_session(&key, &question, |s| {
            s.rerecord();
            s.snapshot()
        })
        .await;
    Ok(Json(snapshot))
}

/// POST /api/v1/interviews/:id/questions/:index/recording/save
pub async fn handle_save_answer(
    State(state): State<AppState>,
    session: Session,
    Path((interview_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<UserAnswer>, AppError> {
    let (key, question) = resolve(&state, &session, interview_id, index).await?;
    let answer = save_answer(&state.recordings, state.store.as_ref(), &key, &question).await?;
    Ok(Json(answer))
}

/// GET /api/v1/interviews/:id/feedback
pub async fn handle_feedback_report(
    State(state): State<AppState>,
    session: Session,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<FeedbackReport>, AppError> {
    let report = build_feedback_report(state.store.as_ref(), &session, interview_id).await?;
    Ok(Json(report))
}
