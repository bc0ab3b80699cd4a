use anyhow::Result;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::interview::form::InterviewForm;
use crate::models::answer::{AnswerInsert, NewUserAnswer, UserAnswer};
use crate::models::interview::{Interview, InterviewRow, QuestionAnswer};
use crate::models::user::{NewUserProfile, UserProfile};
use crate::store::InterviewStore;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterviewStore for PgStore {
    async fn ensure_user(&self, profile: &NewUserProfile) -> Result<(UserProfile, bool)> {
        let created: Option<UserProfile> = sqlx::query_as(
            r#"
            INSERT INTO users (id, name, email, image_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.image_url)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(user) = created {
            info!("Created profile for user {}", user.id);
            return Ok((user, true));
        }

        let existing = sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE id = $1")
            .bind(&profile.id)
            .fetch_one(&self.pool)
            .await?;
        Ok((existing, false))
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(
            sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_interview(
        &self,
        user_id: &str,
        form: &InterviewForm,
        questions: &[QuestionAnswer],
    ) -> Result<Interview> {
        let row: InterviewRow = sqlx::query_as(
            r#"
            INSERT INTO interviews
                (id, user_id, position, description, experience, tech_stack, questions)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&form.position)
        .bind(&form.description)
        .bind(form.experience)
        .bind(&form.tech_stack)
        .bind(Json(questions))
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted interview {} for user {user_id}", row.id);
        Ok(row.into())
    }

    async fn update_interview(
        &self,
        id: Uuid,
        user_id: &str,
        form: &InterviewForm,
        questions: &[QuestionAnswer],
    ) -> Result<Option<Interview>> {
        let row: Option<InterviewRow> = sqlx::query_as(
            r#"
            UPDATE interviews
            SET position = $1, description = $2, experience = $3, tech_stack = $4,
                questions = $5, updated_at = now()
            WHERE id = $6 AND user_id = $7
            RETURNING *
            "#,
        )
        .bind(&form.position)
        .bind(&form.description)
        .bind(form.experience)
        .bind(&form.tech_stack)
        .bind(Json(questions))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Interview::from))
    }

    async fn delete_interview(&self, id: Uuid, user_id: &str) -> Result<bool> {
        // user_answers rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM interviews WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        let row: Option<InterviewRow> = sqlx::query_as("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Interview::from))
    }

    async fn list_interviews(&self, user_id: &str) -> Result<Vec<Interview>> {
        let rows: Vec<InterviewRow> = sqlx::query_as(
            "SELECT * FROM interviews WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Interview::from).collect())
    }

    async fn insert_answer(&self, answer: &NewUserAnswer) -> Result<AnswerInsert> {
        let inserted: Option<UserAnswer> = sqlx::query_as(
            r#"
            INSERT INTO user_answers
                (id, interview_id, question, reference_answer, user_answer,
                 rating, feedback, feedback_status, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT ON CONSTRAINT user_answers_one_per_question DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(answer.interview_id)
        .bind(&answer.question)
        .bind(&answer.reference_answer)
        .bind(&answer.user_answer)
        .bind(answer.rating)
        .bind(&answer.feedback)
        .bind(&answer.feedback_status)
        .bind(&answer.user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match inserted {
            Some(row) => AnswerInsert::Inserted(row),
            None => AnswerInsert::AlreadyAnswered,
        })
    }

    async fn list_answers(&self, user_id: &str, interview_id: Uuid) -> Result<Vec<UserAnswer>> {
        Ok(sqlx::query_as::<_, UserAnswer>(
            r#"
            SELECT * FROM user_answers
            WHERE user_id = $1 AND interview_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
