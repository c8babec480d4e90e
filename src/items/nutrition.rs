//! Nutrition of foods and meals.
//!
//! A food's snapshot is authoritative. A meal's snapshot is the sum of its recipe
//! lines, each ingredient scaled per gram by `quantity / serving_weight`. Ingredients
//! that are themselves meals contribute their cached snapshot; there is no recursion.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use super::repo_types::{Item, NutritionSnapshot};
use crate::{
    error::{AppError, AppResult},
    store::NutritionStore,
};

/// Nutrition of `quantity` grams of `ingredient`.
pub fn portion(ingredient: &Item, quantity: f64) -> AppResult<NutritionSnapshot> {
    let weight = ingredient.nutrition.serving_weight;
    if !(weight.is_finite() && weight > 0.0) {
        return Err(AppError::InvalidIngredient {
            ingredient_id: ingredient.id,
            serving_weight: weight,
        });
    }

    let mut out = NutritionSnapshot::default();
    out.add_scaled(&ingredient.nutrition, quantity / weight);
    out.serving_weight = quantity;
    Ok(out)
}

/// Sums `(ingredient, grams)` portions. No portions yields an all-zero snapshot.
pub fn aggregate<'a, I>(portions: I) -> AppResult<NutritionSnapshot>
where
    I: IntoIterator<Item = (&'a Item, f64)>,
{
    let mut total = NutritionSnapshot::default();
    for (ingredient, quantity) in portions {
        let part = portion(ingredient, quantity)?;
        total.add_scaled(&part, 1.0);
        total.serving_weight += part.serving_weight;
    }
    Ok(total)
}

/// Calories in `quantity` grams of `item`, or `None` when it has no usable serving weight.
pub fn calories_for(item: &Item, quantity: f64) -> Option<f64> {
    portion(item, quantity).ok().map(|p| p.calories)
}

/// Stored snapshot for a food; fresh aggregation over the recipe for a meal.
pub async fn get_nutrition<S>(store: &mut S, item: &Item) -> AppResult<NutritionSnapshot>
where
    S: NutritionStore + ?Sized,
{
    if !item.is_meal {
        return Ok(item.nutrition);
    }

    let lines = store.list_recipe_lines(item.id).await?;
    let ids: Vec<Uuid> = lines.iter().map(|l| l.ingredient_id).collect();
    let ingredients: HashMap<Uuid, Item> = store
        .list_items(&ids)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();

    let portions = lines
        .iter()
        .map(|l| {
            ingredients
                .get(&l.ingredient_id)
                .map(|ing| (ing, l.quantity))
                .ok_or(AppError::NotFound("ingredient"))
        })
        .collect::<AppResult<Vec<_>>>()?;

    aggregate(portions)
}

/// Recomputes a meal's snapshot and persists it. Foods are returned unchanged.
pub async fn refresh_meal<S>(store: &mut S, meal_id: Uuid) -> AppResult<Item>
where
    S: NutritionStore + ?Sized,
{
    let mut meal = store.load_item(meal_id).await?;
    if !meal.is_meal {
        return Ok(meal);
    }

    meal.nutrition = get_nutrition(&mut *store, &meal).await?;
    store.save_item_nutrition(&meal).await?;
    debug!(item_id = %meal.id, calories = meal.nutrition.calories, "meal nutrition refreshed");
    Ok(meal)
}
