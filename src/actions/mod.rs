mod dto;
pub mod handlers;
pub mod ledger;
pub mod recommend;
pub mod repo;
pub mod repo_types;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::action_routes())
        .merge(handlers::ledger_routes())
}
