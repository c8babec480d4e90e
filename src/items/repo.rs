use sqlx::{Executor, Postgres};
use uuid::Uuid;

use super::repo_types::{Item, NutritionSnapshot, RecipeLine};
use crate::error::AppResult;

const ITEM_COLUMNS: &str = "id, name, is_meal, calories, serving_weight, protein, saturated_fat, \
     unsaturated_fat, sugar_carbs, fiber_carbs, starch_carbs, created_at";

// ---- items ----

pub async fn list_items<'e, E>(db: E, is_meal: Option<bool>) -> AppResult<Vec<Item>>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM items \
         WHERE ($1::BOOLEAN IS NULL OR is_meal = $1) ORDER BY name, id"
    );
    let rows = sqlx::query_as::<_, Item>(&sql)
        .bind(is_meal)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find_item<'e, E>(db: E, id: Uuid) -> AppResult<Option<Item>>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");
    let item = sqlx::query_as::<_, Item>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(item)
}

pub async fn list_items_by_ids<'e, E>(db: E, ids: &[Uuid]) -> AppResult<Vec<Item>>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ANY($1) ORDER BY name, id");
    let rows = sqlx::query_as::<_, Item>(&sql)
        .bind(ids)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn insert_item<'e, E>(
    db: E,
    name: &str,
    is_meal: bool,
    n: &NutritionSnapshot,
) -> AppResult<Item>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        r#"
        INSERT INTO items (name, is_meal, calories, serving_weight, protein, saturated_fat,
                           unsaturated_fat, sugar_carbs, fiber_carbs, starch_carbs)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {ITEM_COLUMNS}
        "#
    );
    let item = sqlx::query_as::<_, Item>(&sql)
        .bind(name)
        .bind(is_meal)
        .bind(n.calories)
        .bind(n.serving_weight)
        .bind(n.protein)
        .bind(n.saturated_fat)
        .bind(n.unsaturated_fat)
        .bind(n.sugar_carbs)
        .bind(n.fiber_carbs)
        .bind(n.starch_carbs)
        .fetch_one(db)
        .await?;
    Ok(item)
}

pub async fn update_item<'e, E>(
    db: E,
    id: Uuid,
    name: &str,
    n: &NutritionSnapshot,
) -> AppResult<Option<Item>>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        r#"
        UPDATE items
           SET name = $2, calories = $3, serving_weight = $4, protein = $5, saturated_fat = $6,
               unsaturated_fat = $7, sugar_carbs = $8, fiber_carbs = $9, starch_carbs = $10
         WHERE id = $1
        RETURNING {ITEM_COLUMNS}
        "#
    );
    let item = sqlx::query_as::<_, Item>(&sql)
        .bind(id)
        .bind(name)
        .bind(n.calories)
        .bind(n.serving_weight)
        .bind(n.protein)
        .bind(n.saturated_fat)
        .bind(n.unsaturated_fat)
        .bind(n.sugar_carbs)
        .bind(n.fiber_carbs)
        .bind(n.starch_carbs)
        .fetch_optional(db)
        .await?;
    Ok(item)
}

/// Overwrites the stored nutrition snapshot. Returns whether the item exists.
pub async fn save_nutrition<'e, E>(db: E, id: Uuid, n: &NutritionSnapshot) -> AppResult<bool>
where
    E: Executor<'e, Database = Postgres>,
{
    let res = sqlx::query(
        r#"
        UPDATE items
           SET calories = $2, serving_weight = $3, protein = $4, saturated_fat = $5,
               unsaturated_fat = $6, sugar_carbs = $7, fiber_carbs = $8, starch_carbs = $9
         WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(n.calories)
    .bind(n.serving_weight)
    .bind(n.protein)
    .bind(n.saturated_fat)
    .bind(n.unsaturated_fat)
    .bind(n.sugar_carbs)
    .bind(n.fiber_carbs)
    .bind(n.starch_carbs)
    .execute(db)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_item<'e, E>(db: E, id: Uuid) -> AppResult<bool>
where
    E: Executor<'e, Database = Postgres>,
{
    let res = sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

// ---- recipes ----

pub async fn list_recipe_lines<'e, E>(db: E, meal_id: Option<Uuid>) -> AppResult<Vec<RecipeLine>>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, RecipeLine>(
        r#"
        SELECT id, meal_id, ingredient_id, quantity, created_at
          FROM recipes
         WHERE ($1::UUID IS NULL OR meal_id = $1)
         ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(meal_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_recipe_line<'e, E>(db: E, id: Uuid) -> AppResult<Option<RecipeLine>>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, RecipeLine>(
        r#"
        SELECT id, meal_id, ingredient_id, quantity, created_at
          FROM recipes
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn insert_recipe_line<'e, E>(
    db: E,
    meal_id: Uuid,
    ingredient_id: Uuid,
    quantity: f64,
) -> AppResult<RecipeLine>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, RecipeLine>(
        r#"
        INSERT INTO recipes (meal_id, ingredient_id, quantity)
        VALUES ($1, $2, $3)
        RETURNING id, meal_id, ingredient_id, quantity, created_at
        "#,
    )
    .bind(meal_id)
    .bind(ingredient_id)
    .bind(quantity)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_recipe_quantity<'e, E>(
    db: E,
    id: Uuid,
    quantity: f64,
) -> AppResult<Option<RecipeLine>>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, RecipeLine>(
        r#"
        UPDATE recipes SET quantity = $2
         WHERE id = $1
        RETURNING id, meal_id, ingredient_id, quantity, created_at
        "#,
    )
    .bind(id)
    .bind(quantity)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Deletes a recipe line and returns the meal it belonged to.
pub async fn delete_recipe_line<'e, E>(db: E, id: Uuid) -> AppResult<Option<Uuid>>
where
    E: Executor<'e, Database = Postgres>,
{
    let meal_id =
        sqlx::query_scalar::<_, Uuid>("DELETE FROM recipes WHERE id = $1 RETURNING meal_id")
            .bind(id)
            .fetch_optional(db)
            .await?;
    Ok(meal_id)
}

/// Meals that list `ingredient_id` directly in their recipe.
pub async fn list_meals_using<'e, E>(db: E, ingredient_id: Uuid) -> AppResult<Vec<Uuid>>
where
    E: Executor<'e, Database = Postgres>,
{
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT DISTINCT meal_id
          FROM recipes
         WHERE ingredient_id = $1
        "#,
    )
    .bind(ingredient_id)
    .fetch_all(db)
    .await?;
    Ok(ids)
}
