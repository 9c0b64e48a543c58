use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// User row as stored. `email` is lower-cased before it gets here.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub birth_date: Date,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub birth_date: Date,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: OffsetDateTime,
}
