use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    actions::{
        repo as actions_repo,
        repo_types::{Action, ActionKind},
    },
    error::{AppError, AppResult},
    items::{
        repo as items_repo,
        repo_types::{Item, NutritionSnapshot, RecipeLine},
    },
};

/// Persistence operations the nutrition, ledger and recommendation code reads
/// through. Implemented for a pool, for an open transaction, and in memory.
#[async_trait]
pub trait NutritionStore: Send {
    /// Fails with `NotFound` if the item does not exist.
    async fn load_item(&mut self, id: Uuid) -> AppResult<Item>;
    /// Items with the given ids; unknown ids are skipped.
    async fn list_items(&mut self, ids: &[Uuid]) -> AppResult<Vec<Item>>;
    async fn list_recipe_lines(&mut self, meal_id: Uuid) -> AppResult<Vec<RecipeLine>>;
    async fn list_all_recipe_lines(&mut self) -> AppResult<Vec<RecipeLine>>;
    /// The user's actions of the given kinds in stored order.
    async fn list_actions(&mut self, user_id: Uuid, kinds: &[ActionKind])
        -> AppResult<Vec<Action>>;
    async fn save_item_nutrition(&mut self, item: &Item) -> AppResult<()>;
    /// Renames and re-values an item; `None` if it does not exist.
    async fn update_item(
        &mut self,
        id: Uuid,
        name: &str,
        nutrition: &NutritionSnapshot,
    ) -> AppResult<Option<Item>>;
    /// Removes the item together with its recipe lines and actions.
    async fn delete_item(&mut self, id: Uuid) -> AppResult<bool>;
    /// Meals that list `ingredient_id` directly.
    async fn list_meals_using(&mut self, ingredient_id: Uuid) -> AppResult<Vec<Uuid>>;
    async fn insert_recipe_line(
        &mut self,
        meal_id: Uuid,
        ingredient_id: Uuid,
        quantity: f64,
    ) -> AppResult<RecipeLine>;
    async fn update_recipe_quantity(
        &mut self,
        id: Uuid,
        quantity: f64,
    ) -> AppResult<Option<RecipeLine>>;
    /// Returns the meal the removed line belonged to.
    async fn delete_recipe_line(&mut self, id: Uuid) -> AppResult<Option<Uuid>>;
}

#[async_trait]
impl NutritionStore for PgPool {
    async fn load_item(&mut self, id: Uuid) -> AppResult<Item> {
        items_repo::find_item(&*self, id)
            .await?
            .ok_or(AppError::NotFound("item"))
    }

    async fn list_items(&mut self, ids: &[Uuid]) -> AppResult<Vec<Item>> {
        items_repo::list_items_by_ids(&*self, ids).await
    }

    async fn list_recipe_lines(&mut self, meal_id: Uuid) -> AppResult<Vec<RecipeLine>> {
        items_repo::list_recipe_lines(&*self, Some(meal_id)).await
    }

    async fn list_all_recipe_lines(&mut self) -> AppResult<Vec<RecipeLine>> {
        items_repo::list_recipe_lines(&*self, None).await
    }

    async fn list_actions(
        &mut self,
        user_id: Uuid,
        kinds: &[ActionKind],
    ) -> AppResult<Vec<Action>> {
        actions_repo::list_actions(&*self, user_id, kinds).await
    }

    async fn save_item_nutrition(&mut self, item: &Item) -> AppResult<()> {
        if !items_repo::save_nutrition(&*self, item.id, &item.nutrition).await? {
            return Err(AppError::NotFound("item"));
        }
        Ok(())
    }

    async fn update_item(
        &mut self,
        id: Uuid,
        name: &str,
        nutrition: &NutritionSnapshot,
    ) -> AppResult<Option<Item>> {
        items_repo::update_item(&*self, id, name, nutrition).await
    }

    async fn delete_item(&mut self, id: Uuid) -> AppResult<bool> {
        items_repo::delete_item(&*self, id).await
    }

    async fn list_meals_using(&mut self, ingredient_id: Uuid) -> AppResult<Vec<Uuid>> {
        items_repo::list_meals_using(&*self, ingredient_id).await
    }

    async fn insert_recipe_line(
        &mut self,
        meal_id: Uuid,
        ingredient_id: Uuid,
        quantity: f64,
    ) -> AppResult<RecipeLine> {
        items_repo::insert_recipe_line(&*self, meal_id, ingredient_id, quantity).await
    }

    async fn update_recipe_quantity(
        &mut self,
        id: Uuid,
        quantity: f64,
    ) -> AppResult<Option<RecipeLine>> {
        items_repo::update_recipe_quantity(&*self, id, quantity).await
    }

    async fn delete_recipe_line(&mut self, id: Uuid) -> AppResult<Option<Uuid>> {
        items_repo::delete_recipe_line(&*self, id).await
    }
}

#[async_trait]
impl<'c> NutritionStore for Transaction<'c, Postgres> {
    async fn load_item(&mut self, id: Uuid) -> AppResult<Item> {
        items_repo::find_item(&mut **self, id)
            .await?
            .ok_or(AppError::NotFound("item"))
    }

    async fn list_items(&mut self, ids: &[Uuid]) -> AppResult<Vec<Item>> {
        items_repo::list_items_by_ids(&mut **self, ids).await
    }

    async fn list_recipe_lines(&mut self, meal_id: Uuid) -> AppResult<Vec<RecipeLine>> {
        items_repo::list_recipe_lines(&mut **self, Some(meal_id)).await
    }

    async fn list_all_recipe_lines(&mut self) -> AppResult<Vec<RecipeLine>> {
        items_repo::list_recipe_lines(&mut **self, None).await
    }

    async fn list_actions(
        &mut self,
        user_id: Uuid,
        kinds: &[ActionKind],
    ) -> AppResult<Vec<Action>> {
        actions_repo::list_actions(&mut **self, user_id, kinds).await
    }

    async fn save_item_nutrition(&mut self, item: &Item) -> AppResult<()> {
        if !items_repo::save_nutrition(&mut **self, item.id, &item.nutrition).await? {
            return Err(AppError::NotFound("item"));
        }
        Ok(())
    }

    async fn update_item(
        &mut self,
        id: Uuid,
        name: &str,
        nutrition: &NutritionSnapshot,
    ) -> AppResult<Option<Item>> {
        items_repo::update_item(&mut **self, id, name, nutrition).await
    }

    async fn delete_item(&mut self, id: Uuid) -> AppResult<bool> {
        items_repo::delete_item(&mut **self, id).await
    }

    async fn list_meals_using(&mut self, ingredient_id: Uuid) -> AppResult<Vec<Uuid>> {
        items_repo::list_meals_using(&mut **self, ingredient_id).await
    }

    async fn insert_recipe_line(
        &mut self,
        meal_id: Uuid,
        ingredient_id: Uuid,
        quantity: f64,
    ) -> AppResult<RecipeLine> {
        items_repo::insert_recipe_line(&mut **self, meal_id, ingredient_id, quantity).await
    }

    async fn update_recipe_quantity(
        &mut self,
        id: Uuid,
        quantity: f64,
    ) -> AppResult<Option<RecipeLine>> {
        items_repo::update_recipe_quantity(&mut **self, id, quantity).await
    }

    async fn delete_recipe_line(&mut self, id: Uuid) -> AppResult<Option<Uuid>> {
        items_repo::delete_recipe_line(&mut **self, id).await
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::NutritionStore;
    use crate::{
        actions::repo_types::{Action, ActionKind},
        error::{AppError, AppResult},
        items::repo_types::{Item, NutritionSnapshot, RecipeLine},
    };

    /// In-memory store for exercising the core computations without Postgres.
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        pub items: HashMap<Uuid, Item>,
        pub lines: Vec<RecipeLine>,
        pub actions: Vec<Action>,
        pub saves: usize,
    }

    impl MemoryStore {
        pub fn add_food(&mut self, name: &str, nutrition: NutritionSnapshot) -> Uuid {
            self.insert_item(name, false, nutrition)
        }

        pub fn add_meal(&mut self, name: &str) -> Uuid {
            self.insert_item(name, true, NutritionSnapshot::default())
        }

        fn insert_item(&mut self, name: &str, is_meal: bool, nutrition: NutritionSnapshot) -> Uuid {
            let id = Uuid::new_v4();
            self.items.insert(
                id,
                Item {
                    id,
                    name: name.into(),
                    is_meal,
                    nutrition,
                    created_at: OffsetDateTime::now_utc(),
                },
            );
            id
        }

        pub fn add_line(&mut self, meal_id: Uuid, ingredient_id: Uuid, quantity: f64) -> Uuid {
            let id = Uuid::new_v4();
            self.lines.push(RecipeLine {
                id,
                meal_id,
                ingredient_id,
                quantity,
                created_at: OffsetDateTime::now_utc(),
            });
            id
        }

        pub fn add_action(
            &mut self,
            user_id: Uuid,
            kind: ActionKind,
            item_id: Option<Uuid>,
            ingredient_id: Option<Uuid>,
            quantity: f64,
        ) -> Uuid {
            let id = Uuid::new_v4();
            self.actions.push(Action {
                id,
                user_id,
                kind,
                item_id,
                ingredient_id,
                quantity,
                created_at: OffsetDateTime::now_utc(),
            });
            id
        }

        pub fn item(&self, id: Uuid) -> &Item {
            &self.items[&id]
        }
    }

    #[async_trait]
    impl NutritionStore for MemoryStore {
        async fn load_item(&mut self, id: Uuid) -> AppResult<Item> {
            self.items.get(&id).cloned().ok_or(AppError::NotFound("item"))
        }

        async fn list_items(&mut self, ids: &[Uuid]) -> AppResult<Vec<Item>> {
            Ok(ids.iter().filter_map(|id| self.items.get(id).cloned()).collect())
        }

        async fn list_recipe_lines(&mut self, meal_id: Uuid) -> AppResult<Vec<RecipeLine>> {
            Ok(self
                .lines
                .iter()
                .filter(|l| l.meal_id == meal_id)
                .cloned()
                .collect())
        }

        async fn list_all_recipe_lines(&mut self) -> AppResult<Vec<RecipeLine>> {
            Ok(self.lines.clone())
        }

        async fn list_actions(
            &mut self,
            user_id: Uuid,
            kinds: &[ActionKind],
        ) -> AppResult<Vec<Action>> {
            Ok(self
                .actions
                .iter()
                .filter(|a| a.user_id == user_id && kinds.contains(&a.kind))
                .cloned()
                .collect())
        }

        async fn save_item_nutrition(&mut self, item: &Item) -> AppResult<()> {
            let stored = self
                .items
                .get_mut(&item.id)
                .ok_or(AppError::NotFound("item"))?;
            stored.nutrition = item.nutrition;
            self.saves += 1;
            Ok(())
        }

        async fn update_item(
            &mut self,
            id: Uuid,
            name: &str,
            nutrition: &NutritionSnapshot,
        ) -> AppResult<Option<Item>> {
            Ok(self.items.get_mut(&id).map(|stored| {
                stored.name = name.to_owned();
                stored.nutrition = *nutrition;
                stored.clone()
            }))
        }

        async fn delete_item(&mut self, id: Uuid) -> AppResult<bool> {
            if self.items.remove(&id).is_none() {
                return Ok(false);
            }
            self.lines.retain(|l| l.meal_id != id && l.ingredient_id != id);
            self.actions.retain(|a| a.item_id != Some(id) && a.ingredient_id != Some(id));
            Ok(true)
        }

        async fn list_meals_using(&mut self, ingredient_id: Uuid) -> AppResult<Vec<Uuid>> {
            let mut ids: Vec<Uuid> = self
                .lines
                .iter()
                .filter(|l| l.ingredient_id == ingredient_id)
                .map(|l| l.meal_id)
                .collect();
            ids.sort();
            ids.dedup();
            Ok(ids)
        }

        async fn insert_recipe_line(
            &mut self,
            meal_id: Uuid,
            ingredient_id: Uuid,
            quantity: f64,
        ) -> AppResult<RecipeLine> {
            let id = self.add_line(meal_id, ingredient_id, quantity);
            self.lines
                .iter()
                .find(|l| l.id == id)
                .cloned()
                .ok_or(AppError::NotFound("recipe"))
        }

        async fn update_recipe_quantity(
            &mut self,
            id: Uuid,
            quantity: f64,
        ) -> AppResult<Option<RecipeLine>> {
            Ok(self.lines.iter_mut().find(|l| l.id == id).map(|line| {
                line.quantity = quantity;
                line.clone()
            }))
        }

        async fn delete_recipe_line(&mut self, id: Uuid) -> AppResult<Option<Uuid>> {
            let pos = self.lines.iter().position(|l| l.id == id);
            Ok(pos.map(|i| self.lines.remove(i).meal_id))
        }
    }
}
