use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        CreateItemRequest, CreateRecipeRequest, IngredientLine, ItemQuery, RecipeQuery,
        UpdateItemRequest, UpdateRecipeRequest,
    },
    nutrition, repo,
    repo_types::{Item, NutritionSnapshot, RecipeLine},
    services,
};
use crate::{
    auth::jwt::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    store::NutritionStore,
};

pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/items/:id/ingredients", get(item_ingredients))
        .route("/items/:id/nutrition", get(item_nutrition))
}

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<ItemQuery>,
) -> AppResult<Json<Vec<Item>>> {
    Ok(Json(repo::list_items(&state.db, q.is_meal).await?))
}

#[instrument(skip(state, body))]
pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(body): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<Item>)> {
    let item = services::create_item(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Item>> {
    Ok(Json(services::get_item(&state.db, id).await?))
}

#[instrument(skip(state, body))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateItemRequest>,
) -> AppResult<Json<Item>> {
    Ok(Json(services::update_item(&state.db, id, body).await?))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_item(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn item_ingredients(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<IngredientLine>>> {
    let mut db = state.db.clone();
    Ok(Json(services::list_ingredients(&mut db, id).await?))
}

/// Aggregates on read instead of returning the cached snapshot.
#[instrument(skip(state))]
pub async fn item_nutrition(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<NutritionSnapshot>> {
    let mut db = state.db.clone();
    let item = db.load_item(id).await?;
    Ok(Json(nutrition::get_nutrition(&mut db, &item).await?))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<RecipeQuery>,
) -> AppResult<Json<Vec<RecipeLine>>> {
    Ok(Json(repo::list_recipe_lines(&state.db, q.meal_id).await?))
}

#[instrument(skip(state, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(body): Json<CreateRecipeRequest>,
) -> AppResult<(StatusCode, Json<RecipeLine>)> {
    let line = services::add_recipe_line(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RecipeLine>> {
    let line = repo::find_recipe_line(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("recipe"))?;
    Ok(Json(line))
}

#[instrument(skip(state, body))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRecipeRequest>,
) -> AppResult<Json<RecipeLine>> {
    Ok(Json(
        services::update_recipe_line(&state.db, id, body.quantity).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_recipe_line(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
