use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum YogaExperience {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for YogaExperience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for YogaExperience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!("Unknown yoga experience: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub yoga_experience: YogaExperience,
    pub dietary_preferences: Vec<String>,
    pub allergies: Vec<String>,
    pub goals: Vec<String>,
    pub activity_level: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile fields supplied at registration.
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct NewUser {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 1, max = 120))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[serde(default)]
    pub yoga_experience: YogaExperience,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    pub activity_level: Option<String>,
}

/// Partial profile update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UserUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 120))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub yoga_experience: Option<YogaExperience>,
    pub dietary_preferences: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub goals: Option<Vec<String>>,
    pub activity_level: Option<String>,
}

impl User {
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(age) = update.age {
            self.age = Some(age);
        }
        if let Some(gender) = update.gender {
            self.gender = Some(gender);
        }
        if let Some(experience) = update.yoga_experience {
            self.yoga_experience = experience;
        }
        if let Some(prefs) = update.dietary_preferences {
            self.dietary_preferences = prefs;
        }
        if let Some(allergies) = update.allergies {
            self.allergies = allergies;
        }
        if let Some(goals) = update.goals {
            self.goals = goals;
        }
        if let Some(level) = update.activity_level {
            self.activity_level = Some(level);
        }
    }
}
