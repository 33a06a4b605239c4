use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricTrend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct NutritionTotals {
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_fiber: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct WeeklyMetrics {
    pub adherence_avg: f64,
    pub stress_avg: f64,
    pub motivation_avg: f64,
    pub yoga_consistency: f64,
    pub nutrition: NutritionTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct WeeklyReport {
    pub period: ReportPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub metrics: WeeklyMetrics,
    pub insights: Vec<String>,
    pub barriers_faced: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct MonthlyTrends {
    pub stress: MetricTrend,
    pub motivation: MetricTrend,
    pub adherence: MetricTrend,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct MonthlySummary {
    pub total_checkins: usize,
    pub total_quizzes: usize,
    pub total_meals: usize,
    pub total_yoga_sessions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct MonthlyReport {
    pub period: ReportPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub trends: MonthlyTrends,
    pub summary: MonthlySummary,
    pub next_month_strategy: Vec<String>,
}
