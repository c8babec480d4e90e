use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{
        check_name, check_nutrition, check_quantity, CreateItemRequest, CreateRecipeRequest,
        IngredientLine, UpdateItemRequest,
    },
    nutrition::{self, calories_for},
    repo,
    repo_types::{Item, RecipeLine},
};
use crate::{
    error::{AppError, AppResult, Violations},
    store::NutritionStore,
};

pub async fn create_item(db: &PgPool, req: CreateItemRequest) -> AppResult<Item> {
    let nutrition = req.validated_nutrition()?;
    let item = repo::insert_item(db, req.name.trim(), req.is_meal, &nutrition).await?;
    info!(item_id = %item.id, is_meal = item.is_meal, "item created");
    Ok(item)
}

pub async fn get_item(db: &PgPool, id: Uuid) -> AppResult<Item> {
    repo::find_item(db, id).await?.ok_or(AppError::NotFound("item"))
}

/// Partial update. Changing a food's nutrition refreshes the meals that list it.
pub async fn update_item(db: &PgPool, id: Uuid, req: UpdateItemRequest) -> AppResult<Item> {
    let mut tx = db.begin().await?;
    let updated = apply_item_update(&mut tx, id, req).await?;
    tx.commit().await?;
    info!(item_id = %id, "item updated");
    Ok(updated)
}

/// Deletes the item with its recipe lines and actions, then refreshes the meals
/// that used it as an ingredient.
pub async fn delete_item(db: &PgPool, id: Uuid) -> AppResult<()> {
    let mut tx = db.begin().await?;
    remove_item(&mut tx, id).await?;
    tx.commit().await?;
    info!(item_id = %id, "item deleted");
    Ok(())
}

/// Adds a recipe line and re-caches the meal's nutrition in the same transaction.
pub async fn add_recipe_line(db: &PgPool, req: CreateRecipeRequest) -> AppResult<RecipeLine> {
    let mut tx = db.begin().await?;
    let line = insert_line(&mut tx, req).await?;
    tx.commit().await?;

    info!(
        recipe_id = %line.id,
        meal_id = %line.meal_id,
        ingredient_id = %line.ingredient_id,
        "recipe line added"
    );
    Ok(line)
}

pub async fn update_recipe_line(db: &PgPool, id: Uuid, quantity: f64) -> AppResult<RecipeLine> {
    let mut tx = db.begin().await?;
    let line = change_line_quantity(&mut tx, id, quantity).await?;
    tx.commit().await?;

    info!(recipe_id = %id, quantity, "recipe line updated");
    Ok(line)
}

pub async fn delete_recipe_line(db: &PgPool, id: Uuid) -> AppResult<()> {
    let mut tx = db.begin().await?;
    let meal_id = remove_line(&mut tx, id).await?;
    tx.commit().await?;

    info!(recipe_id = %id, %meal_id, "recipe line deleted");
    Ok(())
}

async fn apply_item_update<S>(store: &mut S, id: Uuid, req: UpdateItemRequest) -> AppResult<Item>
where
    S: NutritionStore + ?Sized,
{
    let current = store.load_item(id).await?;

    let mut v = Violations::default();
    let name = req.name.as_deref().map(str::trim).unwrap_or(current.name.as_str());
    check_name(&mut v, name);
    if current.is_meal && !req.nutrition.is_empty() {
        v.push("nutrition", "meal nutrition is derived from its recipe");
    }
    let nutrition = req.nutrition.apply_to(current.nutrition);
    if !current.is_meal {
        check_nutrition(&mut v, &nutrition, true);
    }
    v.finish()?;

    let updated = store
        .update_item(id, name, &nutrition)
        .await?
        .ok_or(AppError::NotFound("item"))?;

    if nutrition != current.nutrition {
        let parents = store.list_meals_using(id).await?;
        refresh_dependents(&mut *store, parents).await?;
    }
    Ok(updated)
}

async fn remove_item<S>(store: &mut S, id: Uuid) -> AppResult<()>
where
    S: NutritionStore + ?Sized,
{
    let parents = store.list_meals_using(id).await?;
    if !store.delete_item(id).await? {
        return Err(AppError::NotFound("item"));
    }
    let parents = parents.into_iter().filter(|m| *m != id).collect();
    refresh_dependents(&mut *store, parents).await
}

/// Re-caches meals after one of their ingredients changed. A meal that no longer
/// aggregates is left with its old snapshot; the change that triggered the
/// refresh still goes through.
async fn refresh_dependents<S>(store: &mut S, meal_ids: Vec<Uuid>) -> AppResult<()>
where
    S: NutritionStore + ?Sized,
{
    for meal_id in meal_ids {
        match nutrition::refresh_meal(&mut *store, meal_id).await {
            Ok(_) => {}
            Err(AppError::InvalidIngredient {
                ingredient_id,
                serving_weight,
            }) => {
                warn!(
                    %meal_id,
                    %ingredient_id,
                    serving_weight,
                    "meal nutrition left stale, ingredient has no usable serving weight"
                );
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

async fn insert_line<S>(store: &mut S, req: CreateRecipeRequest) -> AppResult<RecipeLine>
where
    S: NutritionStore + ?Sized,
{
    let mut v = Violations::default();
    check_quantity(&mut v, req.quantity);
    v.check(
        req.meal_id != req.ingredient_id,
        "ingredient_id",
        "a meal cannot contain itself",
    );
    v.finish()?;

    let meal = store.load_item(req.meal_id).await?;
    if !meal.is_meal {
        warn!(item_id = %meal.id, "recipe line on non-meal item");
        return Err(AppError::validation("meal_id", "item is not a meal"));
    }
    store.load_item(req.ingredient_id).await?;

    let line = store
        .insert_recipe_line(req.meal_id, req.ingredient_id, req.quantity)
        .await?;
    nutrition::refresh_meal(&mut *store, req.meal_id).await?;
    Ok(line)
}

async fn change_line_quantity<S>(store: &mut S, id: Uuid, quantity: f64) -> AppResult<RecipeLine>
where
    S: NutritionStore + ?Sized,
{
    let mut v = Violations::default();
    check_quantity(&mut v, quantity);
    v.finish()?;

    let line = store
        .update_recipe_quantity(id, quantity)
        .await?
        .ok_or(AppError::NotFound("recipe"))?;
    nutrition::refresh_meal(&mut *store, line.meal_id).await?;
    Ok(line)
}

async fn remove_line<S>(store: &mut S, id: Uuid) -> AppResult<Uuid>
where
    S: NutritionStore + ?Sized,
{
    let meal_id = store
        .delete_recipe_line(id)
        .await?
        .ok_or(AppError::NotFound("recipe"))?;
    nutrition::refresh_meal(&mut *store, meal_id).await?;
    Ok(meal_id)
}

/// Recipe of `item_id` with ingredient names and per-line calories.
pub async fn list_ingredients<S>(store: &mut S, item_id: Uuid) -> AppResult<Vec<IngredientLine>>
where
    S: NutritionStore + ?Sized,
{
    let item = store.load_item(item_id).await?;
    let lines = store.list_recipe_lines(item.id).await?;
    let ids: Vec<Uuid> = lines.iter().map(|l| l.ingredient_id).collect();
    let names: HashMap<Uuid, Item> = store
        .list_items(&ids)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();

    let out = lines
        .into_iter()
        .filter_map(|l| {
            let ingredient = names.get(&l.ingredient_id)?;
            Some(IngredientLine {
                recipe_id: l.id,
                ingredient_id: l.ingredient_id,
                ingredient_name: ingredient.name.clone(),
                quantity: l.quantity,
                calories: calories_for(ingredient, l.quantity),
            })
        })
        .collect();
    Ok(out)
}
