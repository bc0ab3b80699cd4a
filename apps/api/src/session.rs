//! Caller identity, extracted once per request and passed explicitly to every
//! operation that needs it.
//!
//! Authentication happens upstream: the identity provider's gateway verifies the
//! user and forwards who they are in these headers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::models::user::NewUserProfile;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_IMAGE_HEADER: &str = "x-user-image-url";

const DEFAULT_NAME: &str = "Anonymous";
const DEFAULT_EMAIL: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
}

impl Session {
    /// Profile to store on first sign-in.
    pub fn new_profile(&self) -> NewUserProfile {
        NewUserProfile {
            id: self.user_id.clone(),
            name: self.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string()),
            email: self
                .email
                .clone()
                .unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            image_url: self.image_url.clone(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER).ok_or(AppError::Unauthorized)?;
        Ok(Session {
            user_id,
            name: header(parts, USER_NAME_HEADER),
            email: header(parts, USER_EMAIL_HEADER),
            image_url: header(parts, USER_IMAGE_HEADER),
        })
    }
}

fn header(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
