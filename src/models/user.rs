use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user. `password_hash` never serializes, mirroring the
/// teacher's `auth::models::User`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub locale: String,
    pub created_at_utc: DateTime<Utc>,
}

impl User {
    /// Case-insensitive uniqueness key for email (spec.md §3: "unique email
    /// (case-insensitive)").
    pub fn email_key(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub locale: String,
    pub created_at_utc: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            locale: user.locale.clone(),
            created_at_utc: user.created_at_utc,
        }
    }
}
