use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAnswer {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub question: String,
    pub reference_answer: String,
    pub user_answer: String,
    pub rating: f64,
    pub feedback: String,
    /// "generated" | "unavailable"
    pub feedback_status: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to persist an answer; id and timestamp are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewUserAnswer {
    pub interview_id: Uuid,
    pub question: String,
    pub reference_answer: String,
    pub user_answer: String,
    pub rating: f64,
    pub feedback: String,
    pub feedback_status: String,
    pub user_id: String,
}

/// Outcome of the persistence gate.
#[derive(Debug, Clone)]
pub enum AnswerInsert {
    Inserted(UserAnswer),
    AlreadyAnswered,
}
