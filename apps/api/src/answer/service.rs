//! Recording flow: stop-and-score and save, with the network calls made
//! outside the registry lock.

use tracing::info;

use crate::answer::feedback::{generate_feedback, FeedbackOutcome};
use crate::answer::recording::{RecordingKey, RecordingRegistry};
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::answer::{AnswerInsert, NewUserAnswer, UserAnswer};
use crate::models::interview::QuestionAnswer;
use crate::store::InterviewStore;

/// Stops the recording and scores the transcript.
///
/// Too-short answers fail validation before any model call. The model is
/// called once; failures come back as an `unavailable` outcome.
pub async fn stop_and_score(
    registry: &RecordingRegistry,
    llm: &dyn TextGenerator,
    key: &RecordingKey,
    question: &QuestionAnswer,
) -> Result<FeedbackOutcome, AppError> {
    let ticket = registry.with_session(key, question, |s| s.stop()).await?;

    let outcome = generate_feedback(
        llm,
        &ticket.question,
        &ticket.reference_answer,
        &ticket.user_answer,
    )
    .await;

    registry
        .with_session(key, question, |s| s.finish_scoring(ticket.epoch, outcome.clone()))
        .await?;

    Ok(outcome)
}

/// Persists the scored answer through the uniqueness gate.
pub async fn save_answer(
    registry: &RecordingRegistry,
    store: &dyn InterviewStore,
    key: &RecordingKey,
    question: &QuestionAnswer,
) -> Result<UserAnswer, AppError> {
    let ticket = registry.with_session(key, question, |s| s.begin_save()).await?;

    let insert = store
        .insert_answer(&NewUserAnswer {
            interview_id: key.interview_id,
            question: ticket.question.question.clone(),
            reference_answer: ticket.question.answer.clone(),
            user_answer: ticket.user_answer.clone(),
            rating: ticket.feedback.rating,
            feedback: ticket.feedback.feedback.clone(),
            feedback_status: ticket.feedback.status.as_str().to_string(),
            user_id: key.user_id.clone(),
        })
        .await?;

    let saved = matches!(insert, AnswerInsert::Inserted(_));
    registry
        .with_session(key, question, |s| s.finish_save(ticket.epoch, saved))
        .await;

    match insert {
        AnswerInsert::Inserted(answer) => {
            info!(
                "Saved answer {} for interview {} question {}",
                answer.id, key.interview_id, key.question_index
            );
            Ok(answer)
        }
        AnswerInsert::AlreadyAnswered => {
            info!(
                "User {} already answered question {} of interview {}",
                key.user_id, key.question_index, key.interview_id
            );
            Err(AppError::AlreadyAnswered)
        }
    }
}
