use std::sync::Arc;

use crate::answer::recording::RecordingRegistry;
use crate::interview::events::InterviewEvents;
use crate::llm_client::TextGenerator;
use crate::store::InterviewStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Document store. Default: PgStore.
    pub store: Arc<dyn InterviewStore>,
    /// Text generation backend. Default: LlmClient (Anthropic).
    pub llm: Arc<dyn TextGenerator>,
    /// Change feed behind the live interview list.
    pub events: InterviewEvents,
    /// In-flight recording sessions; lost on restart.
    pub recordings: RecordingRegistry,
}
