use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::ActionKind;
use crate::error::{AppResult, Violations};

#[derive(Debug, Deserialize)]
pub struct CreateActionRequest {
    pub kind: ActionKind,
    pub item_id: Option<Uuid>,
    pub ingredient_id: Option<Uuid>,
    pub quantity: f64,
}

impl CreateActionRequest {
    /// ADD names the produced item, EAT/DISPOSE the consumed one, COOK both.
    pub fn validate(&self) -> AppResult<()> {
        let mut v = Violations::default();
        v.check(
            self.quantity.is_finite() && self.quantity > 0.0,
            "quantity",
            "must be a positive number of grams",
        );

        let (wants_item, wants_ingredient) = match self.kind {
            ActionKind::Add => (true, false),
            ActionKind::Eat | ActionKind::Dispose => (false, true),
            ActionKind::Cook => (true, true),
        };
        match (wants_item, self.item_id.is_some()) {
            (true, false) => v.push("item_id", format!("is required for {}", self.kind)),
            (false, true) => v.push("item_id", format!("is not allowed for {}", self.kind)),
            _ => {}
        }
        match (wants_ingredient, self.ingredient_id.is_some()) {
            (true, false) => v.push("ingredient_id", format!("is required for {}", self.kind)),
            (false, true) => v.push("ingredient_id", format!("is not allowed for {}", self.kind)),
            _ => {}
        }
        if self.kind == ActionKind::Cook
            && self.item_id.is_some()
            && self.item_id == self.ingredient_id
        {
            v.push("ingredient_id", "must differ from item_id");
        }

        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionQuery {
    pub kind: Option<ActionKind>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AvailableIngredient {
    pub item_id: Uuid,
    pub name: String,
    pub quantity: f64,
}

#[derive(Debug, Serialize)]
pub struct EatenFood {
    pub action_id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity: f64,
    pub calories: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}
