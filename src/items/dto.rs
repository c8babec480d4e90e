use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::NutritionSnapshot;
use crate::error::{AppResult, Violations};

pub const MAX_NAME_LEN: usize = 100;

/// Nutrition fields as they arrive over the wire; absent fields keep their old value.
#[derive(Debug, Default, Deserialize)]
pub struct NutritionInput {
    pub calories: Option<f64>,
    pub serving_weight: Option<f64>,
    pub protein: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub unsaturated_fat: Option<f64>,
    pub sugar_carbs: Option<f64>,
    pub fiber_carbs: Option<f64>,
    pub starch_carbs: Option<f64>,
}

impl NutritionInput {
    pub fn is_empty(&self) -> bool {
        self.calories.is_none()
            && self.serving_weight.is_none()
            && self.protein.is_none()
            && self.saturated_fat.is_none()
            && self.unsaturated_fat.is_none()
            && self.sugar_carbs.is_none()
            && self.fiber_carbs.is_none()
            && self.starch_carbs.is_none()
    }

    pub fn apply_to(&self, base: NutritionSnapshot) -> NutritionSnapshot {
        NutritionSnapshot {
            calories: self.calories.unwrap_or(base.calories),
            serving_weight: self.serving_weight.unwrap_or(base.serving_weight),
            protein: self.protein.unwrap_or(base.protein),
            saturated_fat: self.saturated_fat.unwrap_or(base.saturated_fat),
            unsaturated_fat: self.unsaturated_fat.unwrap_or(base.unsaturated_fat),
            sugar_carbs: self.sugar_carbs.unwrap_or(base.sugar_carbs),
            fiber_carbs: self.fiber_carbs.unwrap_or(base.fiber_carbs),
            starch_carbs: self.starch_carbs.unwrap_or(base.starch_carbs),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(default)]
    pub is_meal: bool,
    #[serde(flatten)]
    pub nutrition: NutritionInput,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    #[serde(flatten)]
    pub nutrition: NutritionInput,
}

#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    pub is_meal: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    pub meal_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub meal_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub quantity: f64,
}

/// One line of a meal's recipe with the ingredient resolved.
#[derive(Debug, Serialize)]
pub struct IngredientLine {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub quantity: f64,
    pub calories: Option<f64>,
}

pub fn check_name(v: &mut Violations, name: &str) {
    let name = name.trim();
    v.check(!name.is_empty(), "name", "must not be empty");
    v.check(
        name.chars().count() <= MAX_NAME_LEN,
        "name",
        "must be at most 100 characters",
    );
}

/// Every nutrient finite and non-negative. With `positive_weight` the serving
/// weight must also be above zero.
pub fn check_nutrition(v: &mut Violations, n: &NutritionSnapshot, positive_weight: bool) {
    for (field, value) in n.fields() {
        if !value.is_finite() {
            v.push(field, "must be a finite number");
        } else if value < 0.0 {
            v.push(field, "must not be negative");
        }
    }
    if positive_weight && n.serving_weight == 0.0 {
        v.push("serving_weight", "must be positive");
    }
}

pub fn check_quantity(v: &mut Violations, quantity: f64) {
    v.check(
        quantity.is_finite() && quantity > 0.0,
        "quantity",
        "must be a positive number of grams",
    );
}

impl CreateItemRequest {
    /// Snapshot to store for the new item. Meals start empty.
    pub fn validated_nutrition(&self) -> AppResult<NutritionSnapshot> {
        let mut v = Violations::default();
        check_name(&mut v, &self.name);

        let nutrition = self.nutrition.apply_to(NutritionSnapshot::default());
        if self.is_meal {
            v.check(
                self.nutrition.is_empty(),
                "nutrition",
                "meal nutrition is derived from its recipe",
            );
        } else {
            // A missing weight is reported once, as missing.
            let has_weight = self.nutrition.serving_weight.is_some();
            v.check(has_weight, "serving_weight", "is required");
            check_nutrition(&mut v, &nutrition, has_weight);
        }

        v.finish()?;
        Ok(nutrition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn fields(err: AppError) -> Vec<&'static str> {
        match err {
            AppError::Validation(f) => f.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn food_request_deserializes_flat_fields() {
        let req: CreateItemRequest = serde_json::from_str(
            r#"{"name":"apple","calories":52,"serving_weight":100,"protein":0.3}"#,
        )
        .unwrap();
        assert!(!req.is_meal);
        let n = req.validated_nutrition().unwrap();
        assert_eq!(n.calories, 52.0);
        assert_eq!(n.serving_weight, 100.0);
        assert_eq!(n.sugar_carbs, 0.0);
    }

    #[test]
    fn food_without_serving_weight_is_rejected() {
        let req: CreateItemRequest =
            serde_json::from_str(r#"{"name":"apple","calories":52}"#).unwrap();
        assert_eq!(fields(req.validated_nutrition().unwrap_err()), vec!["serving_weight"]);
    }

    #[test]
    fn missing_serving_weight_is_one_violation() {
        let req: CreateItemRequest =
            serde_json::from_str(r#"{"name":"rice","calories":130,"protein":-1}"#).unwrap();
        assert_eq!(
            fields(req.validated_nutrition().unwrap_err()),
            vec!["serving_weight", "protein"]
        );
    }

    #[test]
    fn zero_weight_on_update_is_rejected() {
        let mut v = Violations::default();
        let n = NutritionSnapshot {
            calories: 10.0,
            ..Default::default()
        };
        check_nutrition(&mut v, &n, true);
        assert!(v.finish().is_err());
    }

    #[test]
    fn negative_and_blank_fields_are_reported_together() {
        let req: CreateItemRequest = serde_json::from_str(
            r#"{"name":"  ","calories":-1,"serving_weight":0,"protein":2}"#,
        )
        .unwrap();
        let f = fields(req.validated_nutrition().unwrap_err());
        assert_eq!(f, vec!["name", "calories", "serving_weight"]);
    }

    #[test]
    fn meal_starts_with_zero_nutrition() {
        let req: CreateItemRequest =
            serde_json::from_str(r#"{"name":"stew","is_meal":true}"#).unwrap();
        assert_eq!(req.validated_nutrition().unwrap(), NutritionSnapshot::default());
    }

    #[test]
    fn meal_with_nutrition_is_rejected() {
        let req: CreateItemRequest =
            serde_json::from_str(r#"{"name":"stew","is_meal":true,"calories":100}"#).unwrap();
        assert_eq!(fields(req.validated_nutrition().unwrap_err()), vec!["nutrition"]);
    }

    #[test]
    fn long_name_is_rejected() {
        let mut v = Violations::default();
        check_name(&mut v, &"x".repeat(MAX_NAME_LEN + 1));
        assert!(v.finish().is_err());
    }

    #[test]
    fn apply_to_keeps_unset_fields() {
        let base = NutritionSnapshot {
            calories: 10.0,
            serving_weight: 100.0,
            ..Default::default()
        };
        let input = NutritionInput {
            protein: Some(3.0),
            ..Default::default()
        };
        let n = input.apply_to(base);
        assert_eq!(n.calories, 10.0);
        assert_eq!(n.protein, 3.0);
    }

    #[test]
    fn quantity_must_be_positive() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let mut v = Violations::default();
            check_quantity(&mut v, bad);
            assert!(v.finish().is_err(), "{bad} accepted");
        }
        let mut v = Violations::default();
        check_quantity(&mut v, 0.5);
        assert!(v.finish().is_ok());
    }
}
