//! Meals the user can cook from what they currently have.

use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use super::ledger;
use crate::{
    error::AppResult,
    items::repo_types::{Item, RecipeLine},
    store::NutritionStore,
};

/// Ids of meals whose every recipe line is covered by `available`.
///
/// A meal is only considered when at least one of its ingredients is available,
/// so meals without recipe lines are never recommended.
pub fn cookable_meals(available: &HashMap<Uuid, f64>, lines: &[RecipeLine]) -> BTreeSet<Uuid> {
    let mut by_meal: HashMap<Uuid, Vec<&RecipeLine>> = HashMap::new();
    for line in lines {
        by_meal.entry(line.meal_id).or_default().push(line);
    }

    by_meal
        .into_iter()
        .filter(|(_, recipe)| recipe.iter().any(|l| available.contains_key(&l.ingredient_id)))
        .filter(|(_, recipe)| {
            recipe.iter().all(|l| {
                available
                    .get(&l.ingredient_id)
                    .is_some_and(|have| *have >= l.quantity)
            })
        })
        .map(|(meal_id, _)| meal_id)
        .collect()
}

pub async fn recommend_meals<S>(store: &mut S, user_id: Uuid) -> AppResult<Vec<Item>>
where
    S: NutritionStore + ?Sized,
{
    let available = ledger::available_ingredients(&mut *store, user_id).await?;
    if available.is_empty() {
        return Ok(Vec::new());
    }

    let lines = store.list_all_recipe_lines().await?;
    let ids: Vec<Uuid> = cookable_meals(&available, &lines).into_iter().collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let meals = store
        .list_items(&ids)
        .await?
        .into_iter()
        .filter(|i| i.is_meal)
        .collect();
    Ok(meals)
}
