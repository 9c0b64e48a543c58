use std::sync::Arc;

use time::OffsetDateTime;
use tracing::info;

use crate::error::ApiError;

use super::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use super::password::hash_password;
use super::repo::UserRepository;
use super::repo_types::NewUser;

/// Domain rules over the user store: email normalization, age-gated input
/// handled upstream, soft delete, projection to the outward representation.
/// The repository is the only collaborator.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, ApiError> {
        let users = self.repo.get_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Option<UserResponse>, ApiError> {
        // The store never assigns non-positive ids; skip the round-trip.
        if id <= 0 {
            return Ok(None);
        }
        Ok(self.repo.get_by_id(id).await?.map(UserResponse::from))
    }

    /// Expects input already validated and the email already checked for
    /// uniqueness; the unique index on `users` backs that check under races.
    pub async fn create(&self, input: CreateUserRequest) -> Result<UserResponse, ApiError> {
        let password_hash = hash_password(&input.password)?;
        let user = self
            .repo
            .add(NewUser {
                name: input.name,
                email: input.email.to_lowercase(),
                password_hash,
                birth_date: input.birth_date,
                phone: input.phone,
                active: true,
                created_at: OffsetDateTime::now_utc(),
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "user created");
        Ok(UserResponse::from(user))
    }

    /// Full overwrite of the mutable fields; `None` when the id is unknown.
    /// `created_at` (and the stored password hash) are untouched.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateUserRequest,
    ) -> Result<Option<UserResponse>, ApiError> {
        let Some(mut user) = self.repo.get_by_id(id).await? else {
            return Ok(None);
        };

        user.name = input.name;
        user.email = input.email.to_lowercase();
        user.birth_date = input.birth_date;
        user.phone = input.phone;
        user.active = input.active;
        user.updated_at = Some(OffsetDateTime::now_utc());

        self.repo.update(&user).await?;
        Ok(Some(UserResponse::from(user)))
    }

    /// Soft delete: flips `active` off and stamps `updated_at`. The row and
    /// its email slot remain taken.
    pub async fn remove(&self, id: i64) -> Result<bool, ApiError> {
        if id <= 0 {
            return Ok(false);
        }
        let Some(mut user) = self.repo.get_by_id(id).await? else {
            return Ok(false);
        };

        user.active = false;
        user.updated_at = Some(OffsetDateTime::now_utc());
        self.repo.update(&user).await?;

        info!(user_id = id, "user deactivated");
        Ok(true)
    }

    /// Pre-create check.
    pub async fn email_registered(&self, email: &str) -> Result<bool, ApiError> {
        self.repo.email_exists(&email.to_lowercase()).await
    }

    /// Pre-update check: true only when a different record holds the email,
    /// so a user may keep their own address.
    pub async fn email_registered_to_another(
        &self,
        email: &str,
        id: i64,
    ) -> Result<bool, ApiError> {
        let user = self.repo.get_by_email(&email.to_lowercase()).await?;
        Ok(user.is_some_and(|u| u.id != id))
    }
}
