use std::collections::HashMap;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{
    dto::{AvailableIngredient, CreateActionRequest, EatenFood},
    ledger, repo,
    repo_types::{Action, ActionKind},
};
use crate::{
    error::{AppError, AppResult},
    items::{nutrition::calories_for, repo_types::Item},
    store::NutritionStore,
};

pub async fn list_actions(
    db: &PgPool,
    user_id: Uuid,
    kind: Option<ActionKind>,
) -> AppResult<Vec<Action>> {
    let kinds = match kind {
        Some(k) => vec![k],
        None => ActionKind::ALL.to_vec(),
    };
    repo::list_actions(db, user_id, &kinds).await
}

pub async fn create_action(
    db: &PgPool,
    user_id: Uuid,
    req: CreateActionRequest,
) -> AppResult<Action> {
    req.validate()?;

    let mut tx = db.begin().await?;
    for id in [req.item_id, req.ingredient_id].into_iter().flatten() {
        tx.load_item(id).await?;
    }
    let action = repo::insert_action(
        &mut *tx,
        user_id,
        req.kind,
        req.item_id,
        req.ingredient_id,
        req.quantity,
    )
    .await?;
    tx.commit().await?;

    info!(
        action_id = %action.id,
        %user_id,
        kind = %action.kind,
        quantity = action.quantity,
        "action recorded"
    );
    Ok(action)
}

pub async fn delete_action(db: &PgPool, user_id: Uuid, id: Uuid) -> AppResult<()> {
    if !repo::delete_action(db, user_id, id).await? {
        return Err(AppError::NotFound("action"));
    }
    info!(action_id = %id, %user_id, "action deleted");
    Ok(())
}

async fn items_by_id<S>(store: &mut S, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, Item>>
where
    S: NutritionStore + ?Sized,
{
    Ok(store
        .list_items(&ids)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect())
}

/// Positive stock per item, named and sorted by name.
pub async fn available_ingredients<S>(
    store: &mut S,
    user_id: Uuid,
) -> AppResult<Vec<AvailableIngredient>>
where
    S: NutritionStore + ?Sized,
{
    let available = ledger::available_ingredients(&mut *store, user_id).await?;
    let items = items_by_id(&mut *store, available.keys().copied().collect()).await?;

    let mut out: Vec<AvailableIngredient> = available
        .into_iter()
        .filter_map(|(item_id, quantity)| {
            items.get(&item_id).map(|item| AvailableIngredient {
                item_id,
                name: item.name.clone(),
                quantity,
            })
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name).then(a.item_id.cmp(&b.item_id)));
    Ok(out)
}

/// EAT history with item names and calories of each portion.
pub async fn eaten_food<S>(store: &mut S, user_id: Uuid) -> AppResult<Vec<EatenFood>>
where
    S: NutritionStore + ?Sized,
{
    let entries = ledger::eaten_food(&mut *store, user_id).await?;
    let items = items_by_id(&mut *store, entries.iter().map(|e| e.item_id).collect()).await?;

    let out = entries
        .into_iter()
        .filter_map(|e| {
            let item = items.get(&e.item_id)?;
            Some(EatenFood {
                action_id: e.action_id,
                item_id: e.item_id,
                item_name: item.name.clone(),
                quantity: e.quantity,
                calories: calories_for(item, e.quantity),
                timestamp: e.timestamp,
            })
        })
        .collect();
    Ok(out)
}
