use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use super::validation::{validate_create, validate_update};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/usuarios", get(list_users).post(create_user))
        .route(
            "/usuarios/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    match state.users.get(id).await? {
        Some(user) => Ok(Json(user)),
        None => Err(ApiError::NotFound),
    }
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, HeaderMap, Json<UserResponse>), ApiError> {
    let errors = validate_create(&payload);
    if !errors.is_empty() {
        warn!("create rejected by validation");
        return Err(ApiError::Validation(errors));
    }

    if state.users.email_registered(&payload.email).await? {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("email already registered".into()));
    }

    let user = state.users.create(payload).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        format!("/usuarios/{}", user.id).parse().unwrap(),
    );

    Ok((StatusCode::CREATED, headers, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let errors = validate_update(&payload);
    if !errors.is_empty() {
        warn!(%id, "update rejected by validation");
        return Err(ApiError::Validation(errors));
    }

    // 404 wins over 409 when the id is unknown.
    if state.users.get(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    if state
        .users
        .email_registered_to_another(&payload.email, id)
        .await?
    {
        warn!(%id, email = %payload.email, "email registered to another user");
        return Err(ApiError::Conflict(
            "email already registered to another user".into(),
        ));
    }

    match state.users.update(id, payload).await? {
        Some(user) => Ok(Json(user)),
        None => Err(ApiError::NotFound),
    }
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.users.remove(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
