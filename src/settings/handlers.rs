use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use super::{dto::UpdateSettingsRequest, repo, repo_types::UserSettings};
use crate::{auth::jwt::AuthUser, error::AppResult, state::AppState};

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/user-settings", get(get_settings).put(update_settings))
}

#[instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserSettings>> {
    Ok(Json(repo::get_or_create(&state.db, user_id).await?))
}

#[instrument(skip(state, body))]
pub async fn update_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<UpdateSettingsRequest>,
) -> AppResult<Json<UserSettings>> {
    let current = repo::get_or_create(&state.db, user_id).await?;
    let next = body.apply(current)?;
    let saved = repo::update(&state.db, &next).await?;
    info!(%user_id, "nutrition goals updated");
    Ok(Json(saved))
}
