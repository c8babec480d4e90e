use sqlx::{Executor, Postgres};
use uuid::Uuid;

use super::repo_types::{Action, ActionKind, ActionRow};
use crate::error::AppResult;

/// The user's actions of the given kinds, oldest first.
pub async fn list_actions<'e, E>(
    db: E,
    user_id: Uuid,
    kinds: &[ActionKind],
) -> AppResult<Vec<Action>>
where
    E: Executor<'e, Database = Postgres>,
{
    let kinds: Vec<&str> = kinds.iter().map(ActionKind::as_str).collect();
    let rows = sqlx::query_as::<_, ActionRow>(
        r#"
        SELECT id, user_id, kind, item_id, ingredient_id, quantity, created_at
          FROM actions
         WHERE user_id = $1 AND kind = ANY($2)
         ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .bind(&kinds)
    .fetch_all(db)
    .await?;

    let actions = rows
        .into_iter()
        .map(Action::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(actions)
}

pub async fn insert_action<'e, E>(
    db: E,
    user_id: Uuid,
    kind: ActionKind,
    item_id: Option<Uuid>,
    ingredient_id: Option<Uuid>,
    quantity: f64,
) -> AppResult<Action>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, ActionRow>(
        r#"
        INSERT INTO actions (user_id, kind, item_id, ingredient_id, quantity)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, kind, item_id, ingredient_id, quantity, created_at
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(item_id)
    .bind(ingredient_id)
    .bind(quantity)
    .fetch_one(db)
    .await?;
    Ok(Action::try_from(row)?)
}

/// Deletes one of the user's actions. Other users' actions are left untouched.
pub async fn delete_action<'e, E>(db: E, user_id: Uuid, id: Uuid) -> AppResult<bool>
where
    E: Executor<'e, Database = Postgres>,
{
    let res = sqlx::query("DELETE FROM actions WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
