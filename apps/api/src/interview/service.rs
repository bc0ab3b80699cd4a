//! Interview operations. Every function takes the caller's `Session`; only the
//! owner can see or change an interview.

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::events::InterviewEvents;
use crate::interview::form::InterviewForm;
use crate::interview::generator::generate_questions;
use crate::llm_client::TextGenerator;
use crate::models::interview::{Interview, QuestionAnswer};
use crate::session::Session;
use crate::store::InterviewStore;

/// Validates the form, generates the question set and stores a new interview.
/// Nothing is written if generation fails.
pub async fn create_interview(
    store: &dyn InterviewStore,
    llm: &dyn TextGenerator,
    events: &InterviewEvents,
    session: &Session,
    form: &InterviewForm,
) -> Result<Interview, AppError> {
    form.validate()?;
    let questions = generate_questions(llm, form).await?;
    let interview = store
        .insert_interview(&session.user_id, form, &questions)
        .await?;
    events.notify(&session.user_id);
    info!(
        "Created interview {} ({}) for user {}",
        interview.id, interview.position, session.user_id
    );
    Ok(interview)
}

/// Replaces the configuration and regenerates the question set.
pub async fn update_interview(
    store: &dyn InterviewStore,
    llm: &dyn TextGenerator,
    events: &InterviewEvents,
    session: &Session,
    id: Uuid,
    form: &InterviewForm,
) -> Result<Interview, AppError> {
    form.validate()?;
    // ownership is checked before paying for a generation call
    load_owned_interview(store, session, id).await?;
    let questions = generate_questions(llm, form).await?;
    let interview = store
        .update_interview(id, &session.user_id, form, &questions)
        .await?
        .ok_or_else(|| not_found(id))?;
    events.notify(&session.user_id);
    info!("Updated interview {id} for user {}", session.user_id);
    Ok(interview)
}

pub async fn delete_interview(
    store: &dyn InterviewStore,
    events: &InterviewEvents,
    session: &Session,
    id: Uuid,
) -> Result<(), AppError> {
    if !store.delete_interview(id, &session.user_id).await? {
        return Err(not_found(id));
    }
    events.notify(&session.user_id);
    info!("Deleted interview {id} for user {}", session.user_id);
    Ok(())
}

/// Fetches an interview the caller owns. Someone else's interview is reported
/// as missing.
pub async fn load_owned_interview(
    store: &dyn InterviewStore,
    session: &Session,
    id: Uuid,
) -> Result<Interview, AppError> {
    store
        .get_interview(id)
        .await?
        .filter(|i| i.is_owned_by(&session.user_id))
        .ok_or_else(|| not_found(id))
}

/// Looks up one question of an owned interview by position.
pub async fn load_question(
    store: &dyn InterviewStore,
    session: &Session,
    id: Uuid,
    index: usize,
) -> Result<QuestionAnswer, AppError> {
    let interview = load_owned_interview(store, session, id).await?;
    interview
        .questions
        .get(index)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Question {index} of interview {id} not found")))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Interview {id} not found"))
}
