mod dto;
pub mod handlers;
mod password;
pub(crate) mod repo;
mod repo_types;
mod services;
mod validation;

use axum::Router;

use crate::state::AppState;

pub use repo::PgUserRepository;
pub use services::UserService;
pub use validation::FieldErrors;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
