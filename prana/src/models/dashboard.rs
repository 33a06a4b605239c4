use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::SessionType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct YogaProgress {
    /// Sessions planned in the last seven days.
    pub streak: usize,
    pub consistency_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct NutrientProgress {
    pub protein_total: f64,
    pub fiber_total: f64,
    pub calcium_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct WellnessProgress {
    pub stress_reduction: f64,
    pub adherence_avg: f64,
    /// Newer-half adherence mean minus older-half mean.
    pub adherence_improvement: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct DashboardPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct DashboardOverview {
    pub yoga: YogaProgress,
    pub nutrition: NutrientProgress,
    pub wellness: WellnessProgress,
    pub period: DashboardPeriod,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
}

/// Chart series, each in chronological order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct DashboardTrends {
    pub adherence: Vec<TrendPoint>,
    pub stress: Vec<TrendPoint>,
    pub motivation: Vec<TrendPoint>,
    pub protein: Vec<TrendPoint>,
    pub fiber: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct MealCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct RecentVideo {
    pub title: String,
    pub url: String,
    pub session_type: SessionType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct TopItems {
    pub top_meals: Vec<MealCount>,
    pub recent_videos: Vec<RecentVideo>,
}
