use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Add,
    Cook,
    Eat,
    Dispose,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Add,
        ActionKind::Cook,
        ActionKind::Eat,
        ActionKind::Dispose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Add => "ADD",
            ActionKind::Cook => "COOK",
            ActionKind::Eat => "EAT",
            ActionKind::Dispose => "DISPOSE",
        }
    }

    /// Kinds that put quantity of `item_id` into stock.
    pub fn produces(&self) -> bool {
        matches!(self, ActionKind::Add | ActionKind::Cook)
    }

    /// Kinds that take quantity of `ingredient_id` out of stock.
    pub fn consumes(&self) -> bool {
        matches!(self, ActionKind::Eat | ActionKind::Dispose | ActionKind::Cook)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADD" => Ok(ActionKind::Add),
            "COOK" => Ok(ActionKind::Cook),
            "EAT" => Ok(ActionKind::Eat),
            "DISPOSE" => Ok(ActionKind::Dispose),
            other => anyhow::bail!("unknown action kind {other:?}"),
        }
    }
}

/// Raw `actions` row; `kind` is stored as text.
#[derive(Debug, FromRow)]
pub struct ActionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub item_id: Option<Uuid>,
    pub ingredient_id: Option<Uuid>,
    pub quantity: f64,
    pub created_at: OffsetDateTime,
}

/// Immutable log entry moving `quantity` grams between states.
///
/// `item_id` is the produced item (ADD, COOK) and `ingredient_id` the consumed
/// one (EAT, DISPOSE, COOK).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: ActionKind,
    pub item_id: Option<Uuid>,
    pub ingredient_id: Option<Uuid>,
    pub quantity: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Action {
    pub fn produced(&self) -> Option<(Uuid, f64)> {
        if self.kind.produces() {
            self.item_id.map(|id| (id, self.quantity))
        } else {
            None
        }
    }

    pub fn consumed(&self) -> Option<(Uuid, f64)> {
        if self.kind.consumes() {
            self.ingredient_id.map(|id| (id, self.quantity))
        } else {
            None
        }
    }
}

impl TryFrom<ActionRow> for Action {
    type Error = anyhow::Error;

    fn try_from(r: ActionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            kind: r.kind.parse()?,
            item_id: r.item_id,
            ingredient_id: r.ingredient_id,
            quantity: r.quantity,
            created_at: r.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("cook".parse::<ActionKind>().unwrap(), ActionKind::Cook);
        assert_eq!("DISPOSE".parse::<ActionKind>().unwrap(), ActionKind::Dispose);
        assert!("bake".parse::<ActionKind>().is_err());
    }

    #[test]
    fn kind_serializes_uppercase() {
        let json = serde_json::to_string(&ActionKind::Eat).unwrap();
        assert_eq!(json, "\"EAT\"");
        for kind in ActionKind::ALL {
            assert_eq!(kind.to_string().parse::<ActionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn cook_both_produces_and_consumes() {
        let dough = Uuid::new_v4();
        let flour = Uuid::new_v4();
        let cook = Action {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: ActionKind::Cook,
            item_id: Some(dough),
            ingredient_id: Some(flour),
            quantity: 200.0,
            created_at: OffsetDateTime::now_utc(),
        };
        assert_eq!(cook.produced(), Some((dough, 200.0)));
        assert_eq!(cook.consumed(), Some((flour, 200.0)));
    }

    #[test]
    fn eat_ignores_item_field() {
        let eat = Action {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: ActionKind::Eat,
            item_id: Some(Uuid::new_v4()),
            ingredient_id: None,
            quantity: 10.0,
            created_at: OffsetDateTime::now_utc(),
        };
        assert_eq!(eat.produced(), None);
        assert_eq!(eat.consumed(), None);
    }

    #[test]
    fn row_with_unknown_kind_is_rejected() {
        let row = ActionRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: "STEAL".into(),
            item_id: None,
            ingredient_id: None,
            quantity: 1.0,
            created_at: OffsetDateTime::now_utc(),
        };
        assert!(Action::try_from(row).is_err());
    }
}
