use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// Identifier issued by the identity provider.
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
}
