//! Dashboard views: a seven-day overview, chart series and the user's most
//! frequent meals. Like reports, the views are pure functions over fetched
//! rows.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::models::{
    DashboardOverview, DashboardPeriod, DashboardTrends, MealCount, NutrientProgress,
    NutritionPlan, RecentVideo, TopItems, TrendPoint, WellnessProgress, YogaPlan, YogaProgress,
};
use crate::services::nutrition::start_of_day;
use crate::services::report::{adherence_values, mean, round_to, ReportInputs, WEEKLY_WINDOW_DAYS};

pub const DEFAULT_TREND_DAYS: u32 = 30;
pub const MAX_TREND_DAYS: u32 = 365;
/// Plans scanned when ranking meals and listing videos.
const TOP_ITEMS_NUTRITION_SCAN: u32 = 20;
const TOP_ITEMS_YOGA_SCAN: u32 = 10;
const TOP_ITEMS_LIMIT: usize = 5;

pub struct DashboardService {
    db: Arc<dyn DatabaseBackend>,
}

impl DashboardService {
    pub fn new(db: Arc<dyn DatabaseBackend>) -> Self {
        Self { db }
    }

    pub async fn overview(&self, user_id: i64, now: DateTime<Utc>) -> Result<DashboardOverview> {
        let start = start_of_day(now - Duration::days(WEEKLY_WINDOW_DAYS));
        let inputs = ReportInputs::fetch(self.db.as_ref(), user_id, start).await?;
        Ok(overview(&inputs, start.date_naive(), now.date_naive()))
    }

    /// Series over the last `days` days, clamped to `1..=365`.
    pub async fn trends(&self, user_id: i64, days: u32, now: DateTime<Utc>) -> Result<DashboardTrends> {
        let days = days.clamp(1, MAX_TREND_DAYS);
        let start = start_of_day(now - Duration::days(i64::from(days)));
        let inputs = ReportInputs::fetch(self.db.as_ref(), user_id, start).await?;
        tracing::debug!(user_id, days, checkins = inputs.checkins.len(), "Building dashboard trends");
        Ok(trends(&inputs))
    }

    pub async fn top_items(&self, user_id: i64) -> Result<TopItems> {
        let nutrition = self
            .db
            .recent_nutrition_plans(user_id, TOP_ITEMS_NUTRITION_SCAN)
            .await?;
        let yoga = self.db.recent_yoga_plans(user_id, TOP_ITEMS_YOGA_SCAN).await?;
        Ok(top_items(&nutrition, &yoga))
    }
}

pub fn overview(inputs: &ReportInputs, start: NaiveDate, end: NaiveDate) -> DashboardOverview {
    let streak = inputs.yoga_plans.len();
    let consistency = streak as f64 / WEEKLY_WINDOW_DAYS as f64 * 100.0;

    let (protein, fiber, calcium) = inputs.nutrition_plans.iter().fold(
        (0.0, 0.0, 0.0),
        |(pro, fib, cal), plan| {
            (
                pro + plan.nutrients.protein,
                fib + plan.nutrients.fiber,
                cal + plan.nutrients.calcium,
            )
        },
    );

    let stress: Vec<f64> = inputs.quizzes.iter().map(|q| f64::from(q.stress)).collect();
    let stress_avg = mean(&stress).unwrap_or(50.0);
    let stress_reduction = if stress_avg == 0.0 { 0.0 } else { 100.0 - stress_avg };

    let adherence = adherence_values(&inputs.checkins);

    DashboardOverview {
        yoga: YogaProgress {
            streak,
            consistency_percentage: round_to(consistency, 1),
        },
        nutrition: NutrientProgress {
            protein_total: round_to(protein, 1),
            fiber_total: round_to(fiber, 1),
            calcium_total: round_to(calcium, 1),
        },
        wellness: WellnessProgress {
            stress_reduction: round_to(stress_reduction, 1),
            adherence_avg: round_to(mean(&adherence).unwrap_or(0.0), 1),
            adherence_improvement: round_to(half_window_change(&adherence), 1),
        },
        period: DashboardPeriod { start, end },
    }
}

/// Mean of the newer half minus mean of the older half; 0 below two values.
fn half_window_change(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let (older, newer) = values.split_at(values.len() / 2);
    match (mean(older), mean(newer)) {
        (Some(first), Some(second)) => second - first,
        _ => 0.0,
    }
}

pub fn trends(inputs: &ReportInputs) -> DashboardTrends {
    let point = |date: DateTime<Utc>, value: f64| TrendPoint { date, value };

    DashboardTrends {
        adherence: inputs
            .checkins
            .iter()
            .filter_map(|c| c.adherence.map(|a| point(c.date, a)))
            .collect(),
        stress: inputs
            .quizzes
            .iter()
            .map(|q| point(q.date, f64::from(q.stress)))
            .collect(),
        motivation: inputs
            .quizzes
            .iter()
            .map(|q| point(q.date, f64::from(q.motivation)))
            .collect(),
        protein: inputs
            .nutrition_plans
            .iter()
            .map(|p| point(p.date, p.nutrients.protein))
            .collect(),
        fiber: inputs
            .nutrition_plans
            .iter()
            .map(|p| point(p.date, p.nutrients.fiber))
            .collect(),
    }
}

/// `nutrition` and `yoga` are newest first. Meals tied on count keep the
/// order in which they were first seen.
pub fn top_items(nutrition: &[NutritionPlan], yoga: &[YogaPlan]) -> TopItems {
    let mut counts: Vec<MealCount> = Vec::new();
    for plan in nutrition {
        match counts.iter_mut().find(|meal| meal.name == plan.recipe_name) {
            Some(meal) => meal.count += 1,
            None => counts.push(MealCount {
                name: plan.recipe_name.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_ITEMS_LIMIT);

    TopItems {
        top_meals: counts,
        recent_videos: yoga
            .iter()
            .take(TOP_ITEMS_LIMIT)
            .map(|plan| RecentVideo {
                title: plan.youtube_title.clone(),
                url: plan.youtube_url.clone(),
                session_type: plan.session_type,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::db::test_support::test_backend;
    use crate::models::{
        CheckIn, MealType, NewCheckIn, NewUser, Nutrients, QuizResponse, SessionType,
        NUTRITION_AGENT_NAME, YOGA_AGENT_NAME,
    };
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn checkin(adherence: f64) -> CheckIn {
        CheckIn::new(
            1,
            NewCheckIn {
                adherence: Some(adherence),
                ..Default::default()
            },
            Utc::now(),
        )
    }

    fn quiz(stress: i32) -> QuizResponse {
        QuizResponse::score(1, HashMap::from([("stress".to_string(), stress)]), Utc::now())
    }

    fn meal(name: &str, protein: f64, calcium: f64) -> NutritionPlan {
        NutritionPlan {
            id: nanoid::nanoid!(),
            user_id: 1,
            date: Utc::now(),
            meal_type: MealType::Lunch,
            recipe_name: name.to_string(),
            ingredients: vec![],
            nutrients: Nutrients {
                protein,
                fiber: 2.0,
                calcium,
                ..Default::default()
            },
            recipe_instructions: String::new(),
            meal_simplicity_index: 8.0,
            sattvic_score: 7.5,
            created_by_agent: NUTRITION_AGENT_NAME.to_string(),
        }
    }

    fn session(title: &str) -> YogaPlan {
        YogaPlan {
            id: nanoid::nanoid!(),
            user_id: 1,
            date: Utc::now(),
            session_type: SessionType::StressRelief,
            duration_minutes: 20,
            youtube_video_id: "v1".to_string(),
            youtube_title: title.to_string(),
            youtube_url: "https://www.youtube.com/watch?v=v1".to_string(),
            description: String::new(),
            created_by_agent: YOGA_AGENT_NAME.to_string(),
        }
    }

    #[test]
    fn test_empty_overview() {
        let report = overview(&ReportInputs::default(), day(9), day(16));

        assert_eq!(report.yoga.streak, 0);
        assert_eq!(report.yoga.consistency_percentage, 0.0);
        assert_eq!(report.nutrition.calcium_total, 0.0);
        assert_eq!(report.wellness.stress_reduction, 50.0);
        assert_eq!(report.wellness.adherence_avg, 0.0);
        assert_eq!(report.wellness.adherence_improvement, 0.0);
        assert_eq!(report.period.start, day(9));
    }

    #[test]
    fn test_overview_totals_and_improvement() {
        let inputs = ReportInputs {
            checkins: vec![checkin(40.0), checkin(50.0), checkin(70.0), checkin(80.0)],
            quizzes: vec![quiz(70), quiz(60)],
            nutrition_plans: vec![meal("Khichdi", 12.25, 80.0), meal("Oats", 6.0, 45.5)],
            yoga_plans: vec![session("Calm flow"), session("Evening stretch"), session("Breath")],
        };

        let report = overview(&inputs, day(9), day(16));

        assert_eq!(report.yoga.streak, 3);
        assert_eq!(report.yoga.consistency_percentage, 42.9);
        assert_eq!(report.nutrition.protein_total, 18.3);
        assert_eq!(report.nutrition.fiber_total, 4.0);
        assert_eq!(report.nutrition.calcium_total, 125.5);
        assert_eq!(report.wellness.stress_reduction, 35.0);
        assert_eq!(report.wellness.adherence_avg, 60.0);
        assert_eq!(report.wellness.adherence_improvement, 30.0);
    }

    #[test]
    fn test_zero_stress_reports_no_reduction() {
        let inputs = ReportInputs {
            quizzes: vec![quiz(0)],
            ..Default::default()
        };
        assert_eq!(overview(&inputs, day(9), day(16)).wellness.stress_reduction, 0.0);
    }

    #[test]
    fn test_trends_skip_missing_adherence() {
        let inputs = ReportInputs {
            checkins: vec![
                checkin(40.0),
                CheckIn::new(1, NewCheckIn::default(), Utc::now()),
            ],
            quizzes: vec![quiz(80)],
            nutrition_plans: vec![meal("Khichdi", 12.0, 80.0)],
            ..Default::default()
        };

        let series = trends(&inputs);

        assert_eq!(series.adherence.len(), 1);
        assert_eq!(series.adherence[0].value, 40.0);
        assert_eq!(series.stress[0].value, 80.0);
        assert_eq!(series.motivation[0].value, 50.0);
        assert_eq!(series.protein[0].value, 12.0);
        assert_eq!(series.fiber[0].value, 2.0);
    }

    #[test]
    fn test_top_items_rank_by_frequency() {
        let nutrition = vec![
            meal("Oats", 0.0, 0.0),
            meal("Khichdi", 0.0, 0.0),
            meal("Khichdi", 0.0, 0.0),
            meal("Dal", 0.0, 0.0),
            meal("Upma", 0.0, 0.0),
            meal("Poha", 0.0, 0.0),
            meal("Kheer", 0.0, 0.0),
        ];
        let yoga: Vec<YogaPlan> = (0..7).map(|i| session(&format!("Session {i}"))).collect();

        let items = top_items(&nutrition, &yoga);

        assert_eq!(
            items.top_meals,
            vec![
                MealCount { name: "Khichdi".to_string(), count: 2 },
                MealCount { name: "Oats".to_string(), count: 1 },
                MealCount { name: "Dal".to_string(), count: 1 },
                MealCount { name: "Upma".to_string(), count: 1 },
                MealCount { name: "Poha".to_string(), count: 1 },
            ]
        );
        assert_eq!(items.recent_videos.len(), 5);
        assert_eq!(items.recent_videos[0].title, "Session 0");
    }

    #[tokio::test]
    async fn test_service_reads_only_the_user_window() {
        let (_dir, db) = test_backend().await;
        let user = db
            .create_user(&NewUser {
                email: "asha@example.com".to_string(),
                name: "Asha".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let now = Utc::now();

        for (adherence, age) in [(10.0, Duration::days(20)), (90.0, Duration::hours(1))] {
            let checkin = CheckIn::new(
                user.id,
                NewCheckIn {
                    adherence: Some(adherence),
                    ..Default::default()
                },
                now - age,
            );
            db.create_checkin(&checkin).await.unwrap();
        }

        let service = DashboardService::new(db.clone());

        let overview = service.overview(user.id, now).await.unwrap();
        assert_eq!(overview.wellness.adherence_avg, 90.0);

        let month = service.trends(user.id, DEFAULT_TREND_DAYS, now).await.unwrap();
        assert_eq!(month.adherence.len(), 2);
        assert_eq!(month.adherence[0].value, 10.0);

        let week = service.trends(user.id, 7, now).await.unwrap();
        assert_eq!(week.adherence.len(), 1);

        let items = service.top_items(user.id).await.unwrap();
        assert!(items.top_meals.is_empty());
        assert!(items.recent_videos.is_empty());
    }
}
