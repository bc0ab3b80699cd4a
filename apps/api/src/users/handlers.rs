//! Axum route handlers for user profiles.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::user::UserProfile;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub user: UserProfile,
    pub created: bool,
}

/// POST /api/v1/users/sync
///
/// Called by the client after every sign-in. Creates the profile on first
/// sign-in; existing profiles are returned untouched.
pub async fn handle_sync_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<SyncResponse>, AppError> {
    let (user, created) = state.store.ensure_user(&session.new_profile()).await?;
    Ok(Json(SyncResponse { user, created }))
}

/// GET /api/v1/users/me
pub async fn handle_get_me(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<UserProfile>, AppError> {
    state
        .store
        .get_user(&session.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", session.user_id)))
}
