mod dto;
pub mod handlers;
pub mod nutrition;
pub mod repo;
pub mod repo_types;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::item_routes())
        .merge(handlers::recipe_routes())
}
