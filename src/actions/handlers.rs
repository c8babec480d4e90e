use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{ActionQuery, AvailableIngredient, CreateActionRequest, EatenFood},
    recommend,
    repo_types::Action,
    services,
};
use crate::{auth::jwt::AuthUser, error::AppResult, items::repo_types::Item, state::AppState};

pub fn action_routes() -> Router<AppState> {
    Router::new()
        .route("/actions", get(list_actions).post(create_action))
        .route("/actions/:id", delete(delete_action))
}

pub fn ledger_routes() -> Router<AppState> {
    Router::new()
        .route("/available-ingredients", get(available_ingredients))
        .route("/eaten-food", get(eaten_food))
        .route("/meal-recommendations", get(meal_recommendations))
}

#[instrument(skip(state))]
pub async fn list_actions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ActionQuery>,
) -> AppResult<Json<Vec<Action>>> {
    Ok(Json(services::list_actions(&state.db, user_id, q.kind).await?))
}

#[instrument(skip(state, body))]
pub async fn create_action(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateActionRequest>,
) -> AppResult<(StatusCode, Json<Action>)> {
    let action = services::create_action(&state.db, user_id, body).await?;
    Ok((StatusCode::CREATED, Json(action)))
}

#[instrument(skip(state))]
pub async fn delete_action(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_action(&state.db, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn available_ingredients(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<AvailableIngredient>>> {
    let mut db = state.db.clone();
    Ok(Json(services::available_ingredients(&mut db, user_id).await?))
}

#[instrument(skip(state))]
pub async fn eaten_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<EatenFood>>> {
    let mut db = state.db.clone();
    Ok(Json(services::eaten_food(&mut db, user_id).await?))
}

#[instrument(skip(state))]
pub async fn meal_recommendations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Item>>> {
    let mut db = state.db.clone();
    let meals = recommend::recommend_meals(&mut db, user_id).await?;
    tracing::debug!(%user_id, count = meals.len(), "meal recommendations");
    Ok(Json(meals))
}
