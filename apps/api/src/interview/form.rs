use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const POSITION_MAX_CHARS: usize = 100;
const DESCRIPTION_MIN_CHARS: usize = 10;

/// The interview configuration a user submits on create or edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewForm {
    pub position: String,
    pub description: String,
    pub experience: f64,
    pub tech_stack: String,
}

impl InterviewForm {
    /// Minimum-length checks only; content is never inspected further.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut problems = Vec::new();

        let position_len = self.position.trim().chars().count();
        if position_len == 0 {
            problems.push("position is required".to_string());
        } else if position_len > POSITION_MAX_CHARS {
            problems.push(format!(
                "position must be at most {POSITION_MAX_CHARS} characters"
            ));
        }

        if self.description.trim().chars().count() < DESCRIPTION_MIN_CHARS {
            problems.push(format!(
                "description must be at least {DESCRIPTION_MIN_CHARS} characters"
            ));
        }

        if !self.experience.is_finite() || self.experience < 0.0 {
            problems.push("experience must be a non-negative number".to_string());
        }

        if self.tech_stack.trim().is_empty() {
            problems.push("tech_stack is required".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(problems.join("; ")))
        }
    }
}
