use crate::state::AppState;
use axum::Router;

mod dto;
mod email;
pub mod handlers;
pub mod jwt;
pub mod password;
mod repo;
mod repo_types;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
