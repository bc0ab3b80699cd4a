//! Document-store port: interviews, answers and user profiles.
//!
//! Handlers only see `Arc<dyn InterviewStore>`; `PgStore` is the production
//! backend.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::interview::form::InterviewForm;
use crate::models::answer::{AnswerInsert, NewUserAnswer, UserAnswer};
use crate::models::interview::{Interview, QuestionAnswer};
use crate::models::user::{NewUserProfile, UserProfile};

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;

#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Creates the profile when absent. Returns the stored profile and whether
    /// it was created by this call.
    async fn ensure_user(&self, profile: &NewUserProfile) -> Result<(UserProfile, bool)>;

    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>>;

    async fn insert_interview(
        &self,
        user_id: &str,
        form: &InterviewForm,
        questions: &[QuestionAnswer],
    ) -> Result<Interview>;

    /// Replaces the configuration and question set. `None` when the interview
    /// does not exist or belongs to someone else.
    async fn update_interview(
        &self,
        id: Uuid,
        user_id: &str,
        form: &InterviewForm,
        questions: &[QuestionAnswer],
    ) -> Result<Option<Interview>>;

    /// Deletes the interview and its answers. `false` when nothing matched.
    async fn delete_interview(&self, id: Uuid, user_id: &str) -> Result<bool>;

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>>;

    /// The user's interviews, newest first.
    async fn list_interviews(&self, user_id: &str) -> Result<Vec<Interview>>;

    /// Writes the answer unless one already exists for the same
    /// (user, interview, question). The check and the write are atomic.
    async fn insert_answer(&self, answer: &NewUserAnswer) -> Result<AnswerInsert>;

    /// The user's answers for one interview, oldest first.
    async fn list_answers(&self, user_id: &str, interview_id: Uuid) -> Result<Vec<UserAnswer>>;
}
