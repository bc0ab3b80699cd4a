use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::service::load_owned_interview;
use crate::models::answer::UserAnswer;
use crate::models::interview::Interview;
use crate::session::Session;
use crate::store::InterviewStore;

#[derive(Debug, Serialize)]
pub struct FeedbackReport {
    pub interview: Interview,
    pub answers: Vec<UserAnswer>,
    /// Mean rating to one decimal place, e.g. "7.5".
    pub overall_rating: String,
}

/// Arithmetic mean of all ratings, formatted to one decimal. "0.0" when empty.
///
/// Halves round away from zero (7.25 shows as "7.3").
pub fn overall_rating(answers: &[UserAnswer]) -> String {
    if answers.is_empty() {
        return "0.0".to_string();
    }
    let total: f64 = answers.iter().map(|a| a.rating).sum();
    let mean = total / answers.len() as f64;
    format!("{:.1}", (mean * 10.0).round() / 10.0)
}

pub async fn build_feedback_report(
    store: &dyn InterviewStore,
    session: &Session,
    interview_id: Uuid,
) -> Result<FeedbackReport, AppError> {
    let interview = load_owned_interview(store, session, interview_id).await?;
    let answers = store.list_answers(&session.user_id, interview_id).await?;
    let overall_rating = overall_rating(&answers);
    Ok(FeedbackReport {
        interview,
        answers,
        overall_rating,
    })
}
