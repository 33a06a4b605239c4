use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One daily self-report. Measured fields are optional so a partial report
/// still contributes whatever it carries.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CheckIn {
    pub id: String,
    pub user_id: i64,
    pub date: DateTime<Utc>,
    pub mood: Option<String>,
    pub mood_score: Option<i32>,
    pub appetite: Option<f64>,
    pub energy: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub adherence: Option<f64>,
    /// Comma separated ingredient list as typed by the user.
    pub ingredients: Option<String>,
    pub notes: Option<String>,
}

/// A check-in as submitted. Ranges are enforced before anything is stored.
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct NewCheckIn {
    pub mood: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub mood_score: Option<i32>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub appetite: Option<f64>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub energy: Option<f64>,
    #[validate(range(min = 0.0, max = 24.0))]
    pub sleep_hours: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub adherence: Option<f64>,
    pub ingredients: Option<String>,
    pub notes: Option<String>,
}

impl CheckIn {
    pub fn new(user_id: i64, data: NewCheckIn, date: DateTime<Utc>) -> Self {
        Self {
            id: nanoid::nanoid!(),
            user_id,
            date,
            mood: data.mood,
            mood_score: data.mood_score,
            appetite: data.appetite,
            energy: data.energy,
            sleep_hours: data.sleep_hours,
            adherence: data.adherence,
            ingredients: data.ingredients,
            notes: data.notes,
        }
    }

    pub fn ingredient_list(&self) -> Vec<String> {
        split_ingredients(self.ingredients.as_deref().unwrap_or_default())
    }
}

/// Splits a comma separated list, dropping blanks.
pub fn split_ingredients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ingredients_drops_blanks() {
        assert_eq!(
            split_ingredients(" rice, , moong dal ,spinach,"),
            vec!["rice", "moong dal", "spinach"]
        );
        assert!(split_ingredients("").is_empty());
    }

    #[test]
    fn test_new_checkin_generates_id() {
        let a = CheckIn::new(1, NewCheckIn::default(), Utc::now());
        let b = CheckIn::new(1, NewCheckIn::default(), Utc::now());
        assert_ne!(a.id, b.id);
        assert!(a.ingredient_list().is_empty());
    }

    #[test]
    fn test_out_of_range_checkin_is_rejected() {
        let ok = NewCheckIn {
            mood_score: Some(7),
            sleep_hours: Some(24.0),
            adherence: Some(0.0),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad = NewCheckIn {
            mood_score: Some(0),
            adherence: Some(120.0),
            ..Default::default()
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("mood_score"));
        assert!(fields.contains_key("adherence"));
    }
}
