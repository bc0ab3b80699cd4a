//! Per-question recording lifecycle.
//!
//! ```text
//! Idle --start--> Recording --stop (>= 30 chars)--> Scoring --result--> Scored
//!                     |                                                  |
//!                     +--stop (< 30 chars)--> Idle          save: Idle | Rejected
//! any --rerecord--> Recording
//! ```
//!
//! Network calls happen outside the registry lock. Each re-record bumps the
//! session epoch; results carrying an older epoch are dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::answer::feedback::FeedbackOutcome;
use crate::answer::transcript::{SpeechFragment, TranscriptAccumulator};
use crate::models::interview::QuestionAnswer;

/// Shortest answer, in characters after trimming, that is sent for scoring.
pub const MIN_ANSWER_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    Idle,
    Recording,
    Scoring,
    Scored,
    Rejected,
}

impl fmt::Display for RecordingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordingState::Idle => "idle",
            RecordingState::Recording => "recording",
            RecordingState::Scoring => "scoring",
            RecordingState::Scored => "scored",
            RecordingState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RecordingError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: RecordingState,
        action: &'static str,
    },

    #[error("Your answer should be at least {min} characters (got {chars})")]
    AnswerTooShort { chars: usize, min: usize },

    #[error("recording was restarted before this step completed")]
    Superseded,
}

/// Work handed out when scoring starts; the model call runs without the lock.
#[derive(Debug, Clone)]
pub struct ScoringTicket {
    pub epoch: u64,
    pub question: String,
    pub reference_answer: String,
    pub user_answer: String,
}

/// Work handed out when a save starts.
#[derive(Debug, Clone)]
pub struct SaveTicket {
    pub epoch: u64,
    pub question: QuestionAnswer,
    pub user_answer: String,
    pub feedback: FeedbackOutcome,
}

/// What clients see of a session.
#[derive(Debug, Clone, Serialize)]
pub struct RecordingSnapshot {
    pub state: RecordingState,
    pub question: String,
    pub answer: String,
    pub interim: Option<String>,
    pub feedback: Option<FeedbackOutcome>,
}

#[derive(Debug, Clone)]
pub struct RecordingSession {
    question: QuestionAnswer,
    state: RecordingState,
    transcript: TranscriptAccumulator,
    feedback: Option<FeedbackOutcome>,
    epoch: u64,
}

impl RecordingSession {
    pub fn new(question: QuestionAnswer) -> Self {
        Self {
            question,
            state: RecordingState::Idle,
            transcript: TranscriptAccumulator::default(),
            feedback: None,
            epoch: 0,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn question(&self) -> &QuestionAnswer {
        &self.question
    }

    /// Idle with nothing captured: indistinguishable from a fresh session.
    fn is_pristine(&self) -> bool {
        self.state == RecordingState::Idle && self.transcript.is_empty() && self.feedback.is_none()
    }

    pub fn snapshot(&self) -> RecordingSnapshot {
        RecordingSnapshot {
            state: self.state,
            question: self.question.question.clone(),
            answer: self.transcript.answer(),
            interim: self.transcript.interim().map(str::to_owned),
            feedback: self.feedback.clone(),
        }
    }

    pub fn start(&mut self) -> Result<(), RecordingError> {
        self.expect_state(RecordingState::Idle, "start recording")?;
        self.transcript.clear();
        self.state = RecordingState::Recording;
        Ok(())
    }

    pub fn update_transcript(&mut self, fragments: Vec<SpeechFragment>) -> Result<(), RecordingError> {
        self.expect_state(RecordingState::Recording, "update the transcript")?;
        self.transcript.replace(fragments);
        Ok(())
    }

    /// Ends capture. Too-short answers drop back to idle without scoring.
    pub fn stop(&mut self) -> Result<ScoringTicket, RecordingError> {
        self.expect_state(RecordingState::Recording, "stop recording")?;

        let user_answer = self.transcript.answer();
        let chars = user_answer.trim().chars().count();
        if chars < MIN_ANSWER_CHARS {
            self.transcript.clear();
            self.state = RecordingState::Idle;
            return Err(RecordingError::AnswerTooShort {
                chars,
                min: MIN_ANSWER_CHARS,
            });
        }

        self.state = RecordingState::Scoring;
        Ok(ScoringTicket {
            epoch: self.epoch,
            question: self.question.question.clone(),
            reference_answer: self.question.answer.clone(),
            user_answer,
        })
    }

    pub fn finish_scoring(&mut self, epoch: u64, outcome: FeedbackOutcome) -> Result<(), RecordingError> {
        if epoch != self.epoch || self.state != RecordingState::Scoring {
            return Err(RecordingError::Superseded);
        }
        self.feedback = Some(outcome);
        self.state = RecordingState::Scored;
        Ok(())
    }

    pub fn begin_save(&self) -> Result<SaveTicket, RecordingError> {
        self.expect_state(RecordingState::Scored, "save")?;
        let feedback = self
            .feedback
            .clone()
            .unwrap_or_else(FeedbackOutcome::unavailable);
        Ok(SaveTicket {
            epoch: self.epoch,
            question: self.question.clone(),
            user_answer: self.transcript.answer(),
            feedback,
        })
    }

    /// Applies the write result. Ignored if the session moved on meanwhile.
    pub fn finish_save(&mut self, epoch: u64, saved: bool) {
        if epoch != self.epoch || self.state != RecordingState::Scored {
            return;
        }
        if saved {
            self.transcript.clear();
            self.feedback = None;
            self.state = RecordingState::Idle;
        } else {
            self.state = RecordingState::Rejected;
        }
    }

    /// Allowed from any state. Discards transcript and feedback.
    pub fn rerecord(&mut self) {
        self.epoch += 1;
        self.transcript.clear();
        self.feedback = None;
        self.state = RecordingState::Recording;
    }

    fn expect_state(&self, expected: RecordingState, action: &'static str) -> Result<(), RecordingError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RecordingError::InvalidTransition {
                state: self.state,
                action,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordingKey {
    pub user_id: String,
    pub interview_id: Uuid,
    pub question_index: usize,
}

/// In-memory recording sessions, one per (user, interview, question index).
///
/// Only sessions holding a transcript, feedback or a non-idle state are kept;
/// a pristine session is recreated on demand.
#[derive(Clone, Default)]
pub struct RecordingRegistry {
    sessions: Arc<Mutex<HashMap<RecordingKey, RecordingSession>>>,
}

impl RecordingRegistry {
    /// Runs `f` against the session for `key`, creating it if needed. A session
    /// whose question no longer matches (the interview was regenerated) is reset.
    pub async fn with_session<R>(
        &self,
        key: &RecordingKey,
        question: &QuestionAnswer,
        f: impl FnOnce(&mut RecordingSession) -> R,
    ) -> R {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(key.clone())
            .or_insert_with(|| RecordingSession::new(question.clone()));
        if session.question() != question {
            *session = RecordingSession::new(question.clone());
        }
        let result = f(session);
        if session.is_pristine() {
            sessions.remove(key);
        }
        result
    }

    /// Drops every session for an interview.
    pub async fn forget_interview(&self, interview_id: Uuid) {
        self.sessions
            .lock()
            .await
            .retain(|key, _| key.interview_id != interview_id);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::feedback::FeedbackStatus;

    const LONG_ANSWER: &str = "Channels pass ownership of values between goroutines safely.";

    fn question() -> QuestionAnswer {
        QuestionAnswer {
            question: "How do goroutines communicate?".to_string(),
            answer: "Through channels.".to_string(),
        }
    }

    fn said(text: &str) -> Vec<SpeechFragment> {
        vec![SpeechFragment {
            transcript: text.to_string(),
            is_final: true,
        }]
    }

    fn generated(rating: f64) -> FeedbackOutcome {
        FeedbackOutcome {
            status: FeedbackStatus::Generated,
            rating,
            feedback: "Solid.".to_string(),
        }
    }

    fn scored_session() -> RecordingSession {
        let mut s = RecordingSession::new(question());
        s.start().unwrap();
        s.update_transcript(said(LONG_ANSWER)).unwrap();
        let ticket = s.stop().unwrap();
        s.finish_scoring(ticket.epoch, generated(8.0)).unwrap();
        s
    }

    #[test]
    fn test_happy_path_to_scored() {
        let mut s = RecordingSession::new(question());
        assert_eq!(s.state(), RecordingState::Idle);
        s.start().unwrap();
        s.update_transcript(said(LONG_ANSWER)).unwrap();
        let ticket = s.stop().unwrap();
        assert_eq!(s.state(), RecordingState::Scoring);
        assert_eq!(ticket.user_answer, LONG_ANSWER);
        assert_eq!(ticket.reference_answer, "Through channels.");
        s.finish_scoring(ticket.epoch, generated(8.0)).unwrap();
        assert_eq!(s.state(), RecordingState::Scored);
        assert_eq!(s.snapshot().feedback.unwrap().rating, 8.0);
    }

    #[test]
    fn test_short_answer_returns_to_idle() {
        let mut s = RecordingSession::new(question());
        s.start().unwrap();
        s.update_transcript(said("   channels   ")).unwrap();
        let err = s.stop().unwrap_err();
        assert_eq!(
            err,
            RecordingError::AnswerTooShort {
                chars: 8,
                min: MIN_ANSWER_CHARS
            }
        );
        assert_eq!(s.state(), RecordingState::Idle);
        assert_eq!(s.snapshot().answer, "");
    }

    #[test]
    fn test_exactly_thirty_characters_is_enough() {
        let mut s = RecordingSession::new(question());
        s.start().unwrap();
        s.update_transcript(said(&"a".repeat(MIN_ANSWER_CHARS))).unwrap();
        assert!(s.stop().is_ok());
    }

    #[test]
    fn test_interim_text_does_not_count_towards_length() {
        let mut s = RecordingSession::new(question());
        s.start().unwrap();
        s.update_transcript(vec![SpeechFragment {
            transcript: LONG_ANSWER.to_string(),
            is_final: false,
        }])
        .unwrap();
        assert!(matches!(
            s.stop(),
            Err(RecordingError::AnswerTooShort { chars: 0, .. })
        ));
    }

    #[test]
    fn test_transcript_updates_require_recording() {
        let mut s = RecordingSession::new(question());
        assert_eq!(
            s.update_transcript(said("x")),
            Err(RecordingError::InvalidTransition {
                state: RecordingState::Idle,
                action: "update the transcript"
            })
        );
    }

    #[test]
    fn test_start_twice_is_invalid() {
        let mut s = RecordingSession::new(question());
        s.start().unwrap();
        assert!(matches!(
            s.start(),
            Err(RecordingError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_save_requires_scored() {
        let s = RecordingSession::new(question());
        assert!(s.begin_save().is_err());
    }

    #[test]
    fn test_successful_save_clears_and_idles() {
        let mut s = scored_session();
        let ticket = s.begin_save().unwrap();
        assert_eq!(ticket.user_answer, LONG_ANSWER);
        assert_eq!(ticket.feedback.rating, 8.0);
        s.finish_save(ticket.epoch, true);
        assert_eq!(s.state(), RecordingState::Idle);
        let snap = s.snapshot();
        assert_eq!(snap.answer, "");
        assert!(snap.feedback.is_none());
    }

    #[test]
    fn test_duplicate_save_is_rejected_state() {
        let mut s = scored_session();
        let ticket = s.begin_save().unwrap();
        s.finish_save(ticket.epoch, false);
        assert_eq!(s.state(), RecordingState::Rejected);
    }

    #[test]
    fn test_rerecord_from_any_state_clears_everything() {
        let mut s = scored_session();
        s.rerecord();
        assert_eq!(s.state(), RecordingState::Recording);
        let snap = s.snapshot();
        assert_eq!(snap.answer, "");
        assert!(snap.feedback.is_none());

        let mut rejected = scored_session();
        let ticket = rejected.begin_save().unwrap();
        rejected.finish_save(ticket.epoch, false);
        rejected.rerecord();
        assert_eq!(rejected.state(), RecordingState::Recording);
    }

    #[test]
    fn test_late_feedback_after_rerecord_is_discarded() {
        let mut s = RecordingSession::new(question());
        s.start().unwrap();
        s.update_transcript(said(LONG_ANSWER)).unwrap();
        let ticket = s.stop().unwrap();
        s.rerecord();
        assert_eq!(
            s.finish_scoring(ticket.epoch, generated(9.0)),
            Err(RecordingError::Superseded)
        );
        assert_eq!(s.state(), RecordingState::Recording);
        assert!(s.snapshot().feedback.is_none());
    }

    #[test]
    fn test_late_save_result_after_rerecord_is_ignored() {
        let mut s = scored_session();
        let ticket = s.begin_save().unwrap();
        s.rerecord();
        s.finish_save(ticket.epoch, true);
        assert_eq!(s.state(), RecordingState::Recording);
    }

    #[tokio::test]
    async fn test_registry_resets_session_when_question_changes() {
        let registry = RecordingRegistry::default();
        let key = RecordingKey {
            user_id: "user_1".to_string(),
            interview_id: Uuid::new_v4(),
            question_index: 0,
        };
        registry
            .with_session(&key, &question(), |s| s.start())
            .await
            .unwrap();

        let replaced = QuestionAnswer {
            question: "What is a WaitGroup?".to_string(),
            answer: "A counter of outstanding goroutines.".to_string(),
        };
        let state = registry
            .with_session(&key, &replaced, |s| s.state())
            .await;
        assert_eq!(state, RecordingState::Idle);
    }

    #[tokio::test]
    async fn test_registry_forgets_interview_sessions() {
        let registry = RecordingRegistry::default();
        let interview_id = Uuid::new_v4();
        for question_index in 0..3 {
            let key = RecordingKey {
                user_id: "user_1".to_string(),
                interview_id,
                question_index,
            };
            registry
                .with_session(&key, &question(), |s| s.start())
                .await
                .unwrap();
        }
        assert_eq!(registry.len().await, 3);
        registry.forget_interview(interview_id).await;
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_registry_keeps_no_entry_for_reads_or_saved_answers() {
        let registry = RecordingRegistry::default();
        let key = RecordingKey {
            user_id: "user_1".to_string(),
            interview_id: Uuid::new_v4(),
            question_index: 0,
        };

        let snap = registry.with_session(&key, &question(), |s| s.snapshot()).await;
        assert_eq!(snap.state, RecordingState::Idle);
        assert_eq!(registry.len().await, 0);

        let ticket = registry
            .with_session(&key, &question(), |s| {
                s.start()?;
                s.update_transcript(said(LONG_ANSWER))?;
                s.stop()
            })
            .await
            .unwrap();
        registry
            .with_session(&key, &question(), |s| s.finish_scoring(ticket.epoch, generated(7.0)))
            .await
            .unwrap();
        assert_eq!(registry.len().await, 1);

        let save = registry
            .with_session(&key, &question(), |s| s.begin_save())
            .await
            .unwrap();
        registry
            .with_session(&key, &question(), |s| s.finish_save(save.epoch, true))
            .await;
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_late_scoring_after_eviction_is_discarded() {
        let registry = RecordingRegistry::default();
        let key = RecordingKey {
            user_id: "user_1".to_string(),
            interview_id: Uuid::new_v4(),
            question_index: 0,
        };
        let ticket = registry
            .with_session(&key, &question(), |s| {
                s.start()?;
                s.update_transcript(said(LONG_ANSWER))?;
                s.stop()
            })
            .await
            .unwrap();
        registry
            .with_session(&key, &question(), |s| {
                s.rerecord();
                s.stop()
            })
            .await
            .unwrap_err();
        assert_eq!(registry.len().await, 0);

        let late = registry
            .with_session(&key, &question(), |s| s.finish_scoring(ticket.epoch, generated(9.0)))
            .await;
        assert_eq!(late, Err(RecordingError::Superseded));
        assert_eq!(registry.len().await, 0);
    }
}
