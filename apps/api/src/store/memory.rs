//! In-memory `InterviewStore` used by tests. Mirrors the Postgres unique key on
//! (user, interview, question) and the cascade on interview delete.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::interview::form::InterviewForm;
use crate::models::answer::{AnswerInsert, NewUserAnswer, UserAnswer};
use crate::models::interview::{Interview, QuestionAnswer};
use crate::models::user::{NewUserProfile, UserProfile};
use crate::store::InterviewStore;

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<UserProfile>>,
    interviews: Mutex<Vec<Interview>>,
    answers: Mutex<Vec<UserAnswer>>,
    read_failure: Mutex<Option<sqlx::Error>>,
}

impl MemoryStore {
    pub fn answer_count(&self) -> usize {
        self.answers.lock().unwrap().len()
    }

    /// Makes the next read fail with `err`.
    pub fn fail_with(&self, err: sqlx::Error) {
        *self.read_failure.lock().unwrap() = Some(err);
    }

    fn take_failure(&self) -> Result<()> {
        match self.read_failure.lock().unwrap().take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl InterviewStore for MemoryStore {
    async fn ensure_user(&self, profile: &NewUserProfile) -> Result<(UserProfile, bool)> {
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.iter().find(|u| u.id == profile.id) {
            return Ok((existing.clone(), false));
        }
        let now = Utc::now();
        let user = UserProfile {
            id: profile.id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            image_url: profile.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok((user, true))
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }

    async fn insert_interview(
        &self,
        user_id: &str,
        form: &InterviewForm,
        questions: &[QuestionAnswer],
    ) -> Result<Interview> {
        let now = Utc::now();
        let interview = Interview {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            position: form.position.clone(),
            description: form.description.clone(),
            experience: form.experience,
            tech_stack: form.tech_stack.clone(),
            questions: questions.to_vec(),
            created_at: now,
            updated_at: now,
        };
        self.interviews.lock().unwrap().push(interview.clone());
        Ok(interview)
    }

    async fn update_interview(
        &self,
        id: Uuid,
        user_id: &str,
        form: &InterviewForm,
        questions: &[QuestionAnswer],
    ) -> Result<Option<Interview>> {
        let mut interviews = self.interviews.lock().unwrap();
        let Some(interview) = interviews
            .iter_mut()
            .find(|i| i.id == id && i.user_id == user_id)
        else {
            return Ok(None);
        };
        interview.position = form.position.clone();
        interview.description = form.description.clone();
        interview.experience = form.experience;
        interview.tech_stack = form.tech_stack.clone();
        interview.questions = questions.to_vec();
        interview.updated_at = Utc::now();
        Ok(Some(interview.clone()))
    }

    async fn delete_interview(&self, id: Uuid, user_id: &str) -> Result<bool> {
        let mut interviews = self.interviews.lock().unwrap();
        let before = interviews.len();
        interviews.retain(|i| !(i.id == id && i.user_id == user_id));
        let deleted = interviews.len() < before;
        if deleted {
            self.answers
                .lock()
                .unwrap()
                .retain(|a| a.interview_id != id);
        }
        Ok(deleted)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        self.take_failure()?;
        Ok(self
            .interviews
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn list_interviews(&self, user_id: &str) -> Result<Vec<Interview>> {
        self.take_failure()?;
        let mut list: Vec<Interview> = self
            .interviews
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        list.reverse();
        Ok(list)
    }

    async fn insert_answer(&self, answer: &NewUserAnswer) -> Result<AnswerInsert> {
        let mut answers = self.answers.lock().unwrap();
        let duplicate = answers.iter().any(|a| {
            a.user_id == answer.user_id
                && a.interview_id == answer.interview_id
                && a.question == answer.question
        });
        if duplicate {
            return Ok(AnswerInsert::AlreadyAnswered);
        }
        let row = UserAnswer {
            id: Uuid::new_v4(),
            interview_id: answer.interview_id,
            question: answer.question.clone(),
            reference_answer: answer.reference_answer.clone(),
            user_answer: answer.user_answer.clone(),
            rating: answer.rating,
            feedback: answer.feedback.clone(),
            feedback_status: answer.feedback_status.clone(),
            user_id: answer.user_id.clone(),
            created_at: Utc::now(),
        };
        answers.push(row.clone());
        Ok(AnswerInsert::Inserted(row))
    }

    async fn list_answers(&self, user_id: &str, interview_id: Uuid) -> Result<Vec<UserAnswer>> {
        self.take_failure()?;
        Ok(self
            .answers
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id && a.interview_id == interview_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(user: &str, interview_id: Uuid, question: &str) -> NewUserAnswer {
        NewUserAnswer {
            interview_id,
            question: question.to_string(),
            reference_answer: "ref".to_string(),
            user_answer: "mine".to_string(),
            rating: 6.0,
            feedback: "ok".to_string(),
            feedback_status: "generated".to_string(),
            user_id: user.to_string(),
        }
    }

    #[tokio::test]
    async fn test_second_answer_for_same_question_is_rejected() {
        let store = MemoryStore::default();
        let interview = Uuid::new_v4();
        let first = store.insert_answer(&answer("u1", interview, "Q?")).await.unwrap();
        let second = store.insert_answer(&answer("u1", interview, "Q?")).await.unwrap();
        assert!(matches!(first, AnswerInsert::Inserted(_)));
        assert!(matches!(second, AnswerInsert::AlreadyAnswered));
        assert_eq!(store.answer_count(), 1);
    }

    #[tokio::test]
    async fn test_other_users_may_answer_the_same_question() {
        let store = MemoryStore::default();
        let interview = Uuid::new_v4();
        store.insert_answer(&answer("u1", interview, "Q?")).await.unwrap();
        let other = store.insert_answer(&answer("u2", interview, "Q?")).await.unwrap();
        assert!(matches!(other, AnswerInsert::Inserted(_)));
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let store = MemoryStore::default();
        let profile = NewUserProfile {
            id: "user_1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            image_url: None,
        };
        let (_, created) = store.ensure_user(&profile).await.unwrap();
        let renamed = NewUserProfile {
            name: "Someone Else".to_string(),
            ..profile
        };
        let (user, created_again) = store.ensure_user(&renamed).await.unwrap();
        assert!(created);
        assert!(!created_again);
        assert_eq!(user.name, "Ada");
    }
}
