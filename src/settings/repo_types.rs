use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_DAILY_CALORIES: f64 = 2000.0;
pub const DEFAULT_DAILY_PROTEIN: f64 = 50.0;
pub const DEFAULT_DAILY_CARBS: f64 = 275.0;
pub const DEFAULT_DAILY_FATS: f64 = 78.0;

/// Daily nutrition targets; one row per user.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct UserSettings {
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub daily_calories: f64,
    pub daily_protein: f64,
    pub daily_carbs: f64,
    pub daily_fats: f64,
}
