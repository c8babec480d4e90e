use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Calories and macro breakdown of one serving of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct NutritionSnapshot {
    pub calories: f64,
    pub serving_weight: f64, // grams
    pub protein: f64,
    pub saturated_fat: f64,
    pub unsaturated_fat: f64,
    pub sugar_carbs: f64,
    pub fiber_carbs: f64,
    pub starch_carbs: f64,
}

impl NutritionSnapshot {
    /// Adds `other` scaled by `factor` to every nutrient field.
    /// Serving weight is left alone; callers account for it separately.
    pub fn add_scaled(&mut self, other: &NutritionSnapshot, factor: f64) {
        self.calories += other.calories * factor;
        self.protein += other.protein * factor;
        self.saturated_fat += other.saturated_fat * factor;
        self.unsaturated_fat += other.unsaturated_fat * factor;
        self.sugar_carbs += other.sugar_carbs * factor;
        self.fiber_carbs += other.fiber_carbs * factor;
        self.starch_carbs += other.starch_carbs * factor;
    }

    /// `(field name, value)` pairs, used for validation.
    pub fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("calories", self.calories),
            ("serving_weight", self.serving_weight),
            ("protein", self.protein),
            ("saturated_fat", self.saturated_fat),
            ("unsaturated_fat", self.unsaturated_fat),
            ("sugar_carbs", self.sugar_carbs),
            ("fiber_carbs", self.fiber_carbs),
            ("starch_carbs", self.starch_carbs),
        ]
    }
}

/// A food or a meal. For meals the nutrition is a cached aggregate of the recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub is_meal: bool,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub nutrition: NutritionSnapshot,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// `quantity` grams of `ingredient_id` go into `meal_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RecipeLine {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
