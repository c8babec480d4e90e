//! Stock of items per user, derived from the full action history on every call.

use std::collections::HashMap;

use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Action, ActionKind};
use crate::{error::AppResult, store::NutritionStore};

/// One EAT action as reported in the history.
#[derive(Debug, Clone, PartialEq)]
pub struct EatenEntry {
    pub action_id: Uuid,
    pub item_id: Uuid,
    pub quantity: f64,
    pub timestamp: OffsetDateTime,
}

/// Produced minus consumed grams per item, keeping only positive balances.
///
/// Items that were only ever consumed never appear.
pub fn available_from<'a, I>(actions: I) -> HashMap<Uuid, f64>
where
    I: IntoIterator<Item = &'a Action>,
{
    let mut produced: HashMap<Uuid, f64> = HashMap::new();
    let mut consumed: HashMap<Uuid, f64> = HashMap::new();

    for action in actions {
        if let Some((id, qty)) = action.produced() {
            *produced.entry(id).or_default() += qty;
        }
        if let Some((id, qty)) = action.consumed() {
            *consumed.entry(id).or_default() += qty;
        }
    }

    produced
        .into_iter()
        .map(|(id, total)| (id, total - consumed.get(&id).copied().unwrap_or(0.0)))
        .filter(|(_, available)| *available > 0.0)
        .collect()
}

/// EAT actions in stored order.
pub fn eaten_from<'a, I>(actions: I) -> Vec<EatenEntry>
where
    I: IntoIterator<Item = &'a Action>,
{
    actions
        .into_iter()
        .filter(|a| a.kind == ActionKind::Eat)
        .filter_map(|a| {
            a.ingredient_id.map(|item_id| EatenEntry {
                action_id: a.id,
                item_id,
                quantity: a.quantity,
                timestamp: a.created_at,
            })
        })
        .collect()
}

pub async fn available_ingredients<S>(store: &mut S, user_id: Uuid) -> AppResult<HashMap<Uuid, f64>>
where
    S: NutritionStore + ?Sized,
{
    let actions = store.list_actions(user_id, &ActionKind::ALL).await?;
    Ok(available_from(&actions))
}

pub async fn eaten_food<S>(store: &mut S, user_id: Uuid) -> AppResult<Vec<EatenEntry>>
where
    S: NutritionStore + ?Sized,
{
    let actions = store.list_actions(user_id, &[ActionKind::Eat]).await?;
    Ok(eaten_from(&actions))
}
