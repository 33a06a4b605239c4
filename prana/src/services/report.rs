//! Weekly and monthly progress reports. The summaries are pure functions
//! over rows fetched for the window; [`ReportService`] only does the fetch.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::models::{
    CheckIn, MetricTrend, MonthlyReport, MonthlySummary, MonthlyTrends, NutritionPlan,
    NutritionTotals, QuizResponse, ReportPeriod, WeeklyMetrics, WeeklyReport, YogaPlan,
};
use crate::services::nutrition::start_of_day;

pub const WEEKLY_WINDOW_DAYS: i64 = 7;
pub const MONTHLY_WINDOW_DAYS: i64 = 30;
/// Half-window mean difference beyond which a metric counts as moving.
const TREND_THRESHOLD: f64 = 5.0;

/// Everything a report is computed from.
#[derive(Debug, Default)]
pub struct ReportInputs {
    pub checkins: Vec<CheckIn>,
    pub quizzes: Vec<QuizResponse>,
    pub nutrition_plans: Vec<NutritionPlan>,
    pub yoga_plans: Vec<YogaPlan>,
}

impl ReportInputs {
    /// Every record of `user_id` dated at or after `since`, oldest first.
    pub async fn fetch(db: &dyn DatabaseBackend, user_id: i64, since: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            checkins: db.checkins_since(user_id, since).await?,
            quizzes: db.quizzes_since(user_id, since).await?,
            nutrition_plans: db.nutrition_plans_since(user_id, since).await?,
            yoga_plans: db.yoga_plans_since(user_id, since).await?,
        })
    }
}

pub struct ReportService {
    db: Arc<dyn DatabaseBackend>,
}

impl ReportService {
    pub fn new(db: Arc<dyn DatabaseBackend>) -> Self {
        Self { db }
    }

    pub async fn weekly_report(&self, user_id: i64, now: DateTime<Utc>) -> Result<WeeklyReport> {
        let start = start_of_day(now - Duration::days(WEEKLY_WINDOW_DAYS));
        let inputs = ReportInputs::fetch(self.db.as_ref(), user_id, start).await?;
        tracing::debug!(user_id, checkins = inputs.checkins.len(), "Building weekly report");
        Ok(weekly_report(&inputs, start.date_naive(), now.date_naive()))
    }

    pub async fn monthly_report(&self, user_id: i64, now: DateTime<Utc>) -> Result<MonthlyReport> {
        let start = start_of_day(now - Duration::days(MONTHLY_WINDOW_DAYS));
        let inputs = ReportInputs::fetch(self.db.as_ref(), user_id, start).await?;
        tracing::debug!(user_id, checkins = inputs.checkins.len(), "Building monthly report");
        Ok(monthly_report(&inputs, start.date_naive(), now.date_naive()))
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Compares the mean of the older half of `values` with the newer half.
/// `values` must be in chronological order.
pub fn metric_trend(values: &[f64]) -> MetricTrend {
    if values.len() < 2 {
        return MetricTrend::InsufficientData;
    }

    let (older, newer) = values.split_at(values.len() / 2);
    let (Some(first), Some(second)) = (mean(older), mean(newer)) else {
        return MetricTrend::InsufficientData;
    };

    let diff = second - first;
    if diff > TREND_THRESHOLD {
        MetricTrend::Improving
    } else if diff < -TREND_THRESHOLD {
        MetricTrend::Declining
    } else {
        MetricTrend::Stable
    }
}

pub(crate) fn adherence_values(checkins: &[CheckIn]) -> Vec<f64> {
    checkins.iter().filter_map(|c| c.adherence).collect()
}

pub fn weekly_report(inputs: &ReportInputs, start_date: NaiveDate, end_date: NaiveDate) -> WeeklyReport {
    let adherence = adherence_values(&inputs.checkins);
    let stress: Vec<f64> = inputs.quizzes.iter().map(|q| f64::from(q.stress)).collect();
    let motivation: Vec<f64> = inputs.quizzes.iter().map(|q| f64::from(q.motivation)).collect();

    let adherence_avg = mean(&adherence).unwrap_or(0.0);
    let stress_avg = mean(&stress).unwrap_or(50.0);
    let motivation_avg = mean(&motivation).unwrap_or(50.0);
    let yoga_days = inputs.yoga_plans.len();
    let yoga_consistency = yoga_days as f64 / WEEKLY_WINDOW_DAYS as f64 * 100.0;

    let (calories, protein, fiber) = inputs.nutrition_plans.iter().fold(
        (0.0, 0.0, 0.0),
        |(cal, pro, fib), plan| {
            (
                cal + plan.nutrients.calories,
                pro + plan.nutrients.protein,
                fib + plan.nutrients.fiber,
            )
        },
    );

    let mut insights = Vec::new();
    let sleep: Vec<f64> = inputs.checkins.iter().filter_map(|c| c.sleep_hours).collect();
    match mean(&sleep) {
        Some(avg) if avg < 6.0 => {
            insights.push("Sleep quality is below optimal. Consider earlier bedtime routines.".to_string())
        }
        Some(avg) if avg >= 8.0 => {
            insights.push("Great sleep consistency! This supports your wellness goals.".to_string())
        }
        _ => {}
    }
    if inputs.quizzes.last().is_some_and(|q| q.stress > 70) {
        insights.push("Stress levels are elevated. Focus on gentle yoga and meditation.".to_string());
    }
    if yoga_days >= 5 {
        insights.push("Excellent yoga consistency! Keep up the momentum.".to_string());
    } else if (1..=2).contains(&yoga_days) {
        insights.push("Consider increasing yoga frequency for better results.".to_string());
    }

    let mut barriers_faced = Vec::new();
    if adherence.iter().filter(|&&a| a < 40.0).count() > 2 {
        barriers_faced.push("Low adherence on multiple days - plans may be too complex".to_string());
    }
    if inputs.quizzes.iter().filter(|q| q.motivation < 40).count() > 1 {
        barriers_faced.push("Motivation dips detected - consider reward-based planning".to_string());
    }

    let mut recommendations = Vec::new();
    if adherence_avg < 50.0 {
        recommendations.push("Simplify meal plans to improve adherence".to_string());
    }
    if stress_avg > 70.0 {
        recommendations.push("Increase stress-relief yoga sessions".to_string());
    }
    if yoga_consistency < 50.0 {
        recommendations.push("Try shorter yoga sessions (10-15 min) for better consistency".to_string());
    }

    WeeklyReport {
        period: ReportPeriod::Weekly,
        start_date,
        end_date,
        metrics: WeeklyMetrics {
            adherence_avg: round_to(adherence_avg, 1),
            stress_avg: round_to(stress_avg, 1),
            motivation_avg: round_to(motivation_avg, 1),
            yoga_consistency: round_to(yoga_consistency, 1),
            nutrition: NutritionTotals {
                total_calories: round_to(calories, 0),
                total_protein: round_to(protein, 1),
                total_fiber: round_to(fiber, 1),
            },
        },
        insights,
        barriers_faced,
        recommendations,
    }
}

pub fn monthly_report(inputs: &ReportInputs, start_date: NaiveDate, end_date: NaiveDate) -> MonthlyReport {
    let stress: Vec<f64> = inputs.quizzes.iter().map(|q| f64::from(q.stress)).collect();
    let motivation: Vec<f64> = inputs.quizzes.iter().map(|q| f64::from(q.motivation)).collect();

    let trends = MonthlyTrends {
        stress: metric_trend(&stress),
        motivation: metric_trend(&motivation),
        adherence: metric_trend(&adherence_values(&inputs.checkins)),
    };

    let mut next_month_strategy = Vec::new();
    match trends.stress {
        MetricTrend::Declining => next_month_strategy
            .push("Continue stress management focus - maintain meditation practices".to_string()),
        MetricTrend::Improving => next_month_strategy
            .push("Stress management is working - can gradually increase challenge".to_string()),
        _ => {}
    }
    match trends.adherence {
        MetricTrend::Declining => next_month_strategy
            .push("Simplify plans and focus on consistency over complexity".to_string()),
        MetricTrend::Improving => {
            next_month_strategy.push("Adherence improving - can introduce more variety".to_string())
        }
        _ => {}
    }

    MonthlyReport {
        period: ReportPeriod::Monthly,
        start_date,
        end_date,
        trends,
        summary: MonthlySummary {
            total_checkins: inputs.checkins.len(),
            total_quizzes: inputs.quizzes.len(),
            total_meals: inputs.nutrition_plans.len(),
            total_yoga_sessions: inputs.yoga_plans.len(),
        },
        next_month_strategy,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::models::NewCheckIn;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn checkin(adherence: Option<f64>, sleep_hours: Option<f64>) -> CheckIn {
        CheckIn::new(
            1,
            NewCheckIn {
                adherence,
                sleep_hours,
                ..Default::default()
            },
            Utc::now(),
        )
    }

    fn quiz(stress: i32, motivation: i32) -> QuizResponse {
        let responses = HashMap::from([
            ("stress".to_string(), stress),
            ("motivation".to_string(), motivation),
        ]);
        QuizResponse::score(1, responses, Utc::now())
    }

    #[test]
    fn test_metric_trend() {
        assert_eq!(metric_trend(&[]), MetricTrend::InsufficientData);
        assert_eq!(metric_trend(&[40.0]), MetricTrend::InsufficientData);
        assert_eq!(metric_trend(&[40.0, 50.0]), MetricTrend::Improving);
        assert_eq!(metric_trend(&[60.0, 52.0, 50.0]), MetricTrend::Declining);
        assert_eq!(metric_trend(&[50.0, 53.0, 52.0, 55.0]), MetricTrend::Stable);
    }

    #[test]
    fn test_empty_week_uses_defaults() {
        let report = weekly_report(&ReportInputs::default(), day(9), day(16));

        assert_eq!(report.metrics.adherence_avg, 0.0);
        assert_eq!(report.metrics.stress_avg, 50.0);
        assert_eq!(report.metrics.motivation_avg, 50.0);
        assert_eq!(report.metrics.yoga_consistency, 0.0);
        assert!(report.insights.is_empty());
        assert!(report.barriers_faced.is_empty());
        assert_eq!(
            report.recommendations,
            vec![
                "Simplify meal plans to improve adherence".to_string(),
                "Try shorter yoga sessions (10-15 min) for better consistency".to_string(),
            ]
        );
    }

    #[test]
    fn test_struggling_week() {
        let inputs = ReportInputs {
            checkins: vec![
                checkin(Some(30.0), Some(5.0)),
                checkin(Some(20.0), Some(5.5)),
                checkin(Some(35.0), None),
            ],
            quizzes: vec![quiz(60, 30), quiz(85, 35)],
            ..Default::default()
        };

        let report = weekly_report(&inputs, day(9), day(16));

        assert_eq!(report.metrics.adherence_avg, 28.3);
        assert_eq!(report.metrics.stress_avg, 72.5);
        assert_eq!(
            report.insights,
            vec![
                "Sleep quality is below optimal. Consider earlier bedtime routines.".to_string(),
                "Stress levels are elevated. Focus on gentle yoga and meditation.".to_string(),
            ]
        );
        assert_eq!(report.barriers_faced.len(), 2);
        assert!(report
            .recommendations
            .contains(&"Increase stress-relief yoga sessions".to_string()));
    }

    #[test]
    fn test_monthly_strategy_follows_trends() {
        let inputs = ReportInputs {
            checkins: vec![checkin(Some(30.0), None), checkin(Some(70.0), None)],
            quizzes: vec![quiz(80, 50), quiz(60, 50)],
            ..Default::default()
        };

        let report = monthly_report(&inputs, day(1), day(16));

        assert_eq!(report.trends.stress, MetricTrend::Declining);
        assert_eq!(report.trends.motivation, MetricTrend::Stable);
        assert_eq!(report.trends.adherence, MetricTrend::Improving);
        assert_eq!(
            report.next_month_strategy,
            vec![
                "Continue stress management focus - maintain meditation practices".to_string(),
                "Adherence improving - can introduce more variety".to_string(),
            ]
        );
        assert_eq!(report.summary.total_checkins, 2);
        assert_eq!(report.summary.total_quizzes, 2);
    }
}
