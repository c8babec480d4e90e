use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{
    UserSettings, DEFAULT_DAILY_CALORIES, DEFAULT_DAILY_CARBS, DEFAULT_DAILY_FATS,
    DEFAULT_DAILY_PROTEIN,
};
use crate::error::AppResult;

/// Returns the user's goals, inserting the defaults on first access.
///
/// The no-op `DO UPDATE` makes a concurrent first access return the winner's row
/// instead of nothing.
pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> AppResult<UserSettings> {
    let settings = sqlx::query_as::<_, UserSettings>(
        r#"
        INSERT INTO user_settings
               (user_id, daily_calories, daily_protein, daily_carbs, daily_fats)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING user_id, daily_calories, daily_protein, daily_carbs, daily_fats
        "#,
    )
    .bind(user_id)
    .bind(DEFAULT_DAILY_CALORIES)
    .bind(DEFAULT_DAILY_PROTEIN)
    .bind(DEFAULT_DAILY_CARBS)
    .bind(DEFAULT_DAILY_FATS)
    .fetch_one(db)
    .await?;
    Ok(settings)
}

pub async fn update(db: &PgPool, s: &UserSettings) -> AppResult<UserSettings> {
    let settings = sqlx::query_as::<_, UserSettings>(
        r#"
        UPDATE user_settings
           SET daily_calories = $2, daily_protein = $3, daily_carbs = $4, daily_fats = $5
         WHERE user_id = $1
        RETURNING user_id, daily_calories, daily_protein, daily_carbs, daily_fats
        "#,
    )
    .bind(s.user_id)
    .bind(s.daily_calories)
    .bind(s.daily_protein)
    .bind(s.daily_carbs)
    .bind(s.daily_fats)
    .fetch_one(db)
    .await?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::User;

    #[tokio::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn concurrent_first_access_returns_defaults_to_both() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let db = PgPool::connect(&url).await.unwrap();
        sqlx::migrate!("./migrations").run(&db).await.unwrap();

        let username = format!("goals-{}", Uuid::new_v4().simple());
        let user = User::create(&db, &username, "goals@example.com", "unused")
            .await
            .unwrap()
            .unwrap();

        let (a, b) = tokio::join!(get_or_create(&db, user.id), get_or_create(&db, user.id));
        for settings in [a.unwrap(), b.unwrap()] {
            assert_eq!(settings.user_id, user.id);
            assert_eq!(settings.daily_calories, DEFAULT_DAILY_CALORIES);
        }
    }
}
