//! Folds a user's latest self-reports into a [`FeatureSnapshot`].

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

use crate::config::ReasoningConfig;
use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::models::{CheckIn, DayType, FeatureSnapshot, QuizResponse};

pub struct ObservationAggregator {
    db: Arc<dyn DatabaseBackend>,
    adherence_window_days: i64,
}

impl ObservationAggregator {
    pub fn new(db: Arc<dyn DatabaseBackend>, config: &ReasoningConfig) -> Self {
        Self {
            db,
            adherence_window_days: config.adherence_window_days,
        }
    }

    /// Reads the latest check-in, latest quiz and windowed adherence for
    /// `user_id`. Missing data is never an error.
    pub async fn snapshot(&self, user_id: i64, now: DateTime<Utc>) -> Result<FeatureSnapshot> {
        let checkin = self.db.latest_checkin(user_id).await?;
        let quiz = self.db.latest_quiz(user_id).await?;
        let since = window_start(now, self.adherence_window_days);
        let adherence = self.db.average_adherence_since(user_id, since).await?;

        let snapshot = fold_snapshot(checkin.as_ref(), quiz.as_ref(), adherence, day_type(now));

        tracing::debug!(
            user_id,
            has_checkin = checkin.is_some(),
            has_quiz = quiz.is_some(),
            adherence_avg = snapshot.adherence_avg,
            day_type = snapshot.day_type.as_str(),
            "Observation snapshot built"
        );

        Ok(snapshot)
    }
}

/// Start of the adherence window: midnight UTC, `days` calendar days ago.
pub fn window_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let start_day = now.date_naive() - Duration::days(days);
    start_day.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

pub fn day_type(now: DateTime<Utc>) -> DayType {
    match now.weekday() {
        Weekday::Sat | Weekday::Sun => DayType::Weekend,
        _ => DayType::Weekday,
    }
}

/// Field-by-field fold: a present record contributes every field it has,
/// and only absent fields fall back to defaults.
pub fn fold_snapshot(
    checkin: Option<&CheckIn>,
    quiz: Option<&QuizResponse>,
    adherence_avg: Option<f64>,
    day_type: DayType,
) -> FeatureSnapshot {
    let defaults = FeatureSnapshot::default();

    FeatureSnapshot {
        sleep_hours: checkin
            .and_then(|c| c.sleep_hours)
            .unwrap_or(defaults.sleep_hours),
        mood_score: checkin
            .and_then(|c| c.mood_score)
            .unwrap_or(defaults.mood_score),
        energy: checkin.and_then(|c| c.energy).unwrap_or(defaults.energy),
        appetite: checkin.and_then(|c| c.appetite).unwrap_or(defaults.appetite),
        stress_score: quiz.map(|q| q.stress).unwrap_or(defaults.stress_score),
        motivation_score: quiz
            .map(|q| q.motivation)
            .unwrap_or(defaults.motivation_score),
        adherence_avg: adherence_avg.unwrap_or(defaults.adherence_avg),
        day_type,
    }
}
