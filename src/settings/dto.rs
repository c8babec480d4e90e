use serde::Deserialize;

use super::repo_types::UserSettings;
use crate::error::{AppResult, Violations};

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSettingsRequest {
    pub daily_calories: Option<f64>,
    pub daily_protein: Option<f64>,
    pub daily_carbs: Option<f64>,
    pub daily_fats: Option<f64>,
}

impl UpdateSettingsRequest {
    /// Applies the provided goals over `current`; each must be finite and non-negative.
    pub fn apply(&self, current: UserSettings) -> AppResult<UserSettings> {
        let mut v = Violations::default();
        for (field, value) in [
            ("daily_calories", self.daily_calories),
            ("daily_protein", self.daily_protein),
            ("daily_carbs", self.daily_carbs),
            ("daily_fats", self.daily_fats),
        ] {
            if let Some(x) = value {
                v.check(x.is_finite() && x >= 0.0, field, "must be a non-negative number");
            }
        }
        v.finish()?;

        Ok(UserSettings {
            daily_calories: self.daily_calories.unwrap_or(current.daily_calories),
            daily_protein: self.daily_protein.unwrap_or(current.daily_protein),
            daily_carbs: self.daily_carbs.unwrap_or(current.daily_carbs),
            daily_fats: self.daily_fats.unwrap_or(current.daily_fats),
            ..current
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, settings::repo_types::DEFAULT_DAILY_CALORIES};
    use uuid::Uuid;

    fn defaults() -> UserSettings {
        UserSettings {
            user_id: Uuid::new_v4(),
            daily_calories: DEFAULT_DAILY_CALORIES,
            daily_protein: 50.0,
            daily_carbs: 275.0,
            daily_fats: 78.0,
        }
    }

    #[test]
    fn partial_update_keeps_other_goals() {
        let current = defaults();
        let req = UpdateSettingsRequest {
            daily_protein: Some(120.0),
            ..Default::default()
        };
        let next = req.apply(current.clone()).unwrap();
        assert_eq!(next.daily_protein, 120.0);
        assert_eq!(next.daily_calories, current.daily_calories);
        assert_eq!(next.user_id, current.user_id);
    }

    #[test]
    fn negative_goal_is_rejected() {
        let req = UpdateSettingsRequest {
            daily_fats: Some(-1.0),
            daily_carbs: Some(f64::NAN),
            ..Default::default()
        };
        match req.apply(defaults()) {
            Err(AppError::Validation(fields)) => {
                let names: Vec<_> = fields.iter().map(|f| f.field).collect();
                assert_eq!(names, vec!["daily_carbs", "daily_fats"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn settings_json_hides_user_id() {
        let json = serde_json::to_value(defaults()).unwrap();
        assert!(json.get("user_id").is_none());
        assert_eq!(json["daily_calories"], 2000.0);
    }
}
