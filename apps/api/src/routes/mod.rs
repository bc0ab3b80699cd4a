pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::answer::handlers as answers;
use crate::interview::handlers as interviews;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Users
        .route("/api/v1/users/sync", post(users::handle_sync_user))
        .route("/api/v1/users/me", get(users::handle_get_me))
        // Interviews
        .route(
            "/api/v1/interviews",
            get(interviews::handle_list_interviews).post(interviews::handle_create_interview),
        )
        .route(
            "/api/v1/interviews/stream",
            get(interviews::handle_stream_interviews),
        )
        .route(
            "/api/v1/interviews/:id",
            get(interviews::handle_get_interview)
                .put(interviews::handle_update_interview)
                .delete(interviews::handle_delete_interview),
        )
        .route(
            "/api/v1/interviews/:id/feedback",
            get(answers::handle_feedback_report),
        )
        // Recording sessions
        .route(
            "/api/v1/interviews/:id/questions/:index/recording",
            get(answers::handle_get_recording),
        )
        .route(
            "/api/v1/interviews/:id/questions/:index/recording/start",
            post(answers::handle_start_recording),
        )
        .route(
            "/api/v1/interviews/:id/questions/:index/recording/transcript",
            post(answers::handle_update_transcript),
        )
        .route(
            "/api/v1/interviews/:id/questions/:index/recording/stop",
            post(answers::handle_stop_recording),
        )
        .route(
            "/api/v1/interviews/:id/questions/:index/recording/rerecord",
            post(answers::handle_rerecord),
        )
        .route(
            "/api/v1/interviews/:id/questions/:index/recording/save",
            post(answers::handle_save_answer),
        )
        .with_state(state)
}
