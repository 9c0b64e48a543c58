use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::ApiError;

use super::repo_types::{NewUser, User};

/// Storage contract for users: CRUD and lookups only. Domain rules and
/// email normalization live in the service layer.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All rows, any `active` state, natural retrieval order.
    async fn get_all(&self) -> Result<Vec<User>, ApiError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<User>, ApiError>;
    /// Exact match on the stored (already lower-cased) email.
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    /// Inserts a row; the store assigns the id and the inserted row is
    /// returned. A duplicate email surfaces as a conflict.
    async fn add(&self, user: NewUser) -> Result<User, ApiError>;
    /// Persists all mutable fields of the row identified by `user.id`.
    /// Callers must have fetched the row first.
    async fn update(&self, user: &User) -> Result<(), ApiError>;
    /// Physical delete. The API surface only soft-deletes; this exists for
    /// completeness.
    async fn remove(&self, user: &User) -> Result<(), ApiError>;
    /// Existence check independent of `active`.
    async fn email_exists(&self, email: &str) -> Result<bool, ApiError>;
}

pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

// The ux_users_email index is the source of truth for uniqueness under
// concurrent writes; 23505 becomes the same conflict the pre-checks report.
fn map_write_error(e: sqlx::Error) -> ApiError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::Conflict("email already registered".into())
        }
        _ => ApiError::Database(e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_all(&self) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, birth_date, phone, active, created_at, updated_at
            FROM users
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, birth_date, phone, active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, birth_date, phone, active, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn add(&self, user: NewUser) -> Result<User, ApiError> {
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, birth_date, phone, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, password_hash, birth_date, phone, active, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.birth_date)
        .bind(&user.phone)
        .bind(user.active)
        .bind(user.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;
        Ok(inserted)
    }

    async fn update(&self, user: &User) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $1, email = $2, password_hash = $3, birth_date = $4,
                phone = $5, active = $6, updated_at = $7
            WHERE id = $8
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.birth_date)
        .bind(&user.phone)
        .bind(user.active)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn remove(&self, user: &User) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, ApiError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }
}


#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::memory::MemoryUserRepository;
    use super::*;

    fn row(id: i64, email: &str) -> User {
        User {
            id,
            name: "Seed User".into(),
            email: email.into(),
            password_hash: "hash".into(),
            birth_date: date!(1990 - 01 - 01),
            phone: None,
            active: true,
            created_at: datetime!(2024-01-01 0:00 UTC),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn add_assigns_the_next_id_and_rejects_duplicate_emails() {
        let repo = MemoryUserRepository::new();
        repo.seed(row(1, "a@x.com"));

        let added = repo
            .add(NewUser {
                name: "New User".into(),
                email: "b@x.com".into(),
                password_hash: "hash".into(),
                birth_date: date!(1990 - 01 - 01),
                phone: None,
                active: true,
                created_at: datetime!(2024-01-01 0:00 UTC),
            })
            .await
            .expect("add should succeed");
        assert_eq!(added.id, 2);

        let err = repo
            .add(NewUser {
                name: "Dup".into(),
                email: "a@x.com".into(),
                password_hash: "hash".into(),
                birth_date: date!(1990 - 01 - 01),
                phone: None,
                active: true,
                created_at: datetime!(2024-01-01 0:00 UTC),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn remove_is_a_physical_delete() {
        let repo = MemoryUserRepository::new();
        repo.seed(row(1, "a@x.com"));

        let user = repo.get_by_id(1).await.unwrap().expect("seeded row");
        repo.remove(&user).await.expect("remove should succeed");

        assert!(repo.get_by_id(1).await.unwrap().is_none());
        assert!(!repo.email_exists("a@x.com").await.unwrap());
    }
}
