//! Value types flowing through the reasoning pipeline.

use serde::{Deserialize, Serialize};

/// Whether the snapshot was taken on a working day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekday => "weekday",
            Self::Weekend => "weekend",
        }
    }
}

/// Flattened view of a user's latest self-reports. Every field is populated;
/// missing records resolve to the defaults in [`FeatureSnapshot::default`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct FeatureSnapshot {
    pub sleep_hours: f64,
    pub mood_score: i32,
    /// Mean adherence (0-100) over the recent check-in window.
    pub adherence_avg: f64,
    pub stress_score: i32,
    pub motivation_score: i32,
    pub energy: f64,
    pub appetite: f64,
    pub day_type: DayType,
}

impl FeatureSnapshot {
    pub const DEFAULT_SLEEP_HOURS: f64 = 7.0;
    pub const DEFAULT_MOOD_SCORE: i32 = 5;
    pub const DEFAULT_ENERGY: f64 = 5.0;
    pub const DEFAULT_APPETITE: f64 = 5.0;
    pub const DEFAULT_QUIZ_SCORE: i32 = 50;
    pub const DEFAULT_ADHERENCE: f64 = 0.0;
}

impl Default for FeatureSnapshot {
    fn default() -> Self {
        Self {
            sleep_hours: Self::DEFAULT_SLEEP_HOURS,
            mood_score: Self::DEFAULT_MOOD_SCORE,
            adherence_avg: Self::DEFAULT_ADHERENCE,
            stress_score: Self::DEFAULT_QUIZ_SCORE,
            motivation_score: Self::DEFAULT_QUIZ_SCORE,
            energy: Self::DEFAULT_ENERGY,
            appetite: Self::DEFAULT_APPETITE,
            day_type: DayType::Weekday,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnergyTrend {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for EnergyTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for EnergyTrend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown energy trend: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AppetiteTrend {
    Low,
    Normal,
    High,
}

impl std::fmt::Display for AppetiteTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Normal => write!(f, "normal"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for AppetiteTrend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown appetite trend: {s}")),
        }
    }
}

/// Output of the trend predictor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct TrendPrediction {
    pub energy_trend: EnergyTrend,
    pub appetite_trend: AppetiteTrend,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RulePriority {
    High,
    Medium,
}

/// A wellness rule whose predicate held for one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct TriggeredRule {
    pub rule_id: String,
    /// Human-readable predicate, including the value that tripped it.
    pub condition: String,
    pub action: String,
    pub priority: RulePriority,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Balanced,
    StressRelief,
    Energizing,
    Flexibility,
    Strength,
    Recovery,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::StressRelief => "stress_relief",
            Self::Energizing => "energizing",
            Self::Flexibility => "flexibility",
            Self::Strength => "strength",
            Self::Recovery => "recovery",
        }
    }

    /// Title-cased label, e.g. `Stress_Relief` for `stress_relief`.
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "stress_relief" => Ok(Self::StressRelief),
            "energizing" => Ok(Self::Energizing),
            "flexibility" => Ok(Self::Flexibility),
            "strength" => Ok(Self::Strength),
            "recovery" => Ok(Self::Recovery),
            _ => Err(format!("Unknown session type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Gentle,
    Medium,
    Moderate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MealComplexity {
    Simple,
    Medium,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NutritionFocus {
    BalancedSattvic,
    MagnesiumRich,
    FavoriteMeal,
    WarmComforting,
    NutrientDense,
}

impl NutritionFocus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BalancedSattvic => "balanced_sattvic",
            Self::MagnesiumRich => "magnesium_rich",
            Self::FavoriteMeal => "favorite_meal",
            Self::WarmComforting => "warm_comforting",
            Self::NutrientDense => "nutrient_dense",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PortionSize {
    Small,
    Normal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpecialAction {
    MeditationSession,
    RewardMeal,
    SimplifiedMode,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct YogaRecommendation {
    pub session_type: SessionType,
    pub duration_minutes: u32,
    pub intensity: Intensity,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct NutritionRecommendation {
    pub meal_complexity: MealComplexity,
    pub focus: NutritionFocus,
    pub portion_size: PortionSize,
}

/// The synthesized plan handed to the nutrition and yoga planners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct RecommendationPlan {
    pub yoga: YogaRecommendation,
    pub nutrition: NutritionRecommendation,
    pub special_actions: Vec<SpecialAction>,
}

impl Default for RecommendationPlan {
    fn default() -> Self {
        Self {
            yoga: YogaRecommendation {
                session_type: SessionType::Balanced,
                duration_minutes: 30,
                intensity: Intensity::Medium,
            },
            nutrition: NutritionRecommendation {
                meal_complexity: MealComplexity::Medium,
                focus: NutritionFocus::BalancedSattvic,
                portion_size: PortionSize::Normal,
            },
            special_actions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_defaults() {
        let snapshot = FeatureSnapshot::default();
        assert_eq!(snapshot.sleep_hours, 7.0);
        assert_eq!(snapshot.mood_score, 5);
        assert_eq!(snapshot.stress_score, 50);
        assert_eq!(snapshot.motivation_score, 50);
        assert_eq!(snapshot.adherence_avg, 0.0);
    }

    #[test]
    fn test_default_plan_serialization() {
        let json = serde_json::to_value(RecommendationPlan::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "yoga": {"session_type": "balanced", "duration_minutes": 30, "intensity": "medium"},
                "nutrition": {
                    "meal_complexity": "medium",
                    "focus": "balanced_sattvic",
                    "portion_size": "normal"
                },
                "special_actions": []
            })
        );
    }

    #[test]
    fn test_session_type_round_trip_and_title() {
        assert_eq!(
            "stress_relief".parse::<SessionType>().unwrap(),
            SessionType::StressRelief
        );
        assert_eq!(SessionType::StressRelief.title(), "Stress_Relief");
        assert_eq!(SessionType::Recovery.title(), "Recovery");
        assert!("pilates".parse::<SessionType>().is_err());
    }

    #[test]
    fn test_trend_display() {
        assert_eq!(EnergyTrend::Medium.to_string(), "medium");
        assert_eq!(AppetiteTrend::Normal.to_string(), "normal");
        assert_eq!("HIGH".parse::<AppetiteTrend>().unwrap(), AppetiteTrend::High);
    }
}
