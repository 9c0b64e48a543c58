use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::repo_types::User;

time::serde::format_description!(date_only, Date, "[year]-[month]-[day]");

/// Request body for user creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(with = "date_only")]
    pub birth_date: Date,
    pub phone: Option<String>,
}

/// Request body for a full user update. Carries no password.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    #[serde(with = "date_only")]
    pub birth_date: Date,
    pub phone: Option<String>,
    pub active: bool,
}

/// Outward projection of a user. The password hash never leaves the service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(with = "date_only")]
    pub birth_date: Date,
    pub phone: Option<String>,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            birth_date: u.birth_date,
            phone: u.phone,
            active: u.active,
            created_at: u.created_at,
        }
    }
}
