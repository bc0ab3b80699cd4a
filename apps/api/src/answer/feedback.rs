//! Feedback generation: rates a user's answer against the reference answer.
//!
//! Best effort: any failure yields an explicit `Unavailable` outcome instead of
//! an error, so the recording flow never stalls on the model.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::answer::prompts::{FEEDBACK_PROMPT, FEEDBACK_SYSTEM};
use crate::llm_client::sanitize::PayloadShape;
use crate::llm_client::template::fill_template;
use crate::llm_client::{generate_structured, TextGenerator};

pub const UNAVAILABLE_FEEDBACK: &str = "Unable to generate feedback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Generated,
    Unavailable,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Generated => "generated",
            FeedbackStatus::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackOutcome {
    pub status: FeedbackStatus,
    /// Expected 1-10; not clamped. 0 when unavailable.
    pub rating: f64,
    pub feedback: String,
}

impl FeedbackOutcome {
    pub fn unavailable() -> Self {
        Self {
            status: FeedbackStatus::Unavailable,
            rating: 0.0,
            feedback: UNAVAILABLE_FEEDBACK.to_string(),
        }
    }
}

/// Shape the model is asked to return.
#[derive(Debug, Deserialize)]
struct RatedAnswer {
    #[serde(alias = "rating")]
    ratings: f64,
    feedback: String,
}

/// Rates `user_answer`. Makes exactly one model call.
pub async fn generate_feedback(
    llm: &dyn TextGenerator,
    question: &str,
    reference_answer: &str,
    user_answer: &str,
) -> FeedbackOutcome {
    let prompt = build_feedback_prompt(question, reference_answer, user_answer);

    match generate_structured::<RatedAnswer>(llm, &prompt, FEEDBACK_SYSTEM, PayloadShape::Object)
        .await
    {
        Ok(rated) => {
            info!("Feedback generated: rating={}", rated.ratings);
            FeedbackOutcome {
                status: FeedbackStatus::Generated,
                rating: rated.ratings,
                feedback: rated.feedback,
            }
        }
        Err(e) => {
            warn!("Feedback generation failed, returning unavailable outcome: {e}");
            FeedbackOutcome::unavailable()
        }
    }
}

fn build_feedback_prompt(question: &str, reference_answer: &str, user_answer: &str) -> String {
    fill_template(
        FEEDBACK_PROMPT,
        &[
            ("question", question),
            ("reference_answer", reference_answer),
            ("user_answer", user_answer),
        ],
    )
}
