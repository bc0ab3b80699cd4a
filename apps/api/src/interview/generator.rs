//! Question generation: asks the model for a fixed-size question/answer set.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::form::InterviewForm;
use crate::interview::prompts::{QUESTION_GENERATION_PROMPT, QUESTION_GENERATION_SYSTEM};
use crate::llm_client::sanitize::PayloadShape;
use crate::llm_client::template::fill_template;
use crate::llm_client::{generate_structured, TextGenerator};
use crate::models::interview::QuestionAnswer;

/// Number of question/answer pairs every interview carries.
pub const QUESTION_COUNT: usize = 5;

/// Generates exactly `QUESTION_COUNT` pairs for the given configuration.
/// Extra pairs are dropped; a short set is an error.
pub async fn generate_questions(
    llm: &dyn TextGenerator,
    form: &InterviewForm,
) -> Result<Vec<QuestionAnswer>, AppError> {
    let prompt = build_question_prompt(form);

    let mut pairs: Vec<QuestionAnswer> =
        generate_structured(llm, &prompt, QUESTION_GENERATION_SYSTEM, PayloadShape::Array)
            .await
            .map_err(|e| AppError::Llm(format!("Question generation failed: {e}")))?;

    pairs.retain(|p| !p.question.trim().is_empty());

    if pairs.len() < QUESTION_COUNT {
        return Err(AppError::Llm(format!(
            "Question generation returned {} usable pairs, expected {QUESTION_COUNT}",
            pairs.len()
        )));
    }
    if pairs.len() > QUESTION_COUNT {
        warn!(
            "Model returned {} question pairs, keeping the first {QUESTION_COUNT}",
            pairs.len()
        );
        pairs.truncate(QUESTION_COUNT);
    }

    info!("Generated {} questions for '{}'", pairs.len(), form.position);
    Ok(pairs)
}

fn build_question_prompt(form: &InterviewForm) -> String {
    fill_template(
        QUESTION_GENERATION_PROMPT,
        &[
            ("count", &QUESTION_COUNT.to_string()),
            ("position", form.position.trim()),
            ("description", form.description.trim()),
            ("experience", &form.experience.to_string()),
            ("tech_stack", form.tech_stack.trim()),
        ],
    )
}
