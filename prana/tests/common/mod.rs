use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use prana::config::{DatabaseConfig, ReasoningConfig};
use prana::db::{Database, DatabaseBackend, LibSqlBackend};
use prana::models::{CheckIn, NewCheckIn, NewUser, QuizResponse};
use prana::services::Reasoner;

/// 2026-10-14, a Wednesday.
pub fn weekday_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
}

/// 2026-10-17, a Saturday.
pub fn weekend_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
}

pub struct TestStore {
    _dir: tempfile::TempDir,
    pub db: Arc<dyn DatabaseBackend>,
}

impl TestStore {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prana.db");
        let raw = Database::new(&DatabaseConfig::local(path.to_string_lossy()))
            .await
            .unwrap();
        Self {
            _dir: dir,
            db: Arc::new(LibSqlBackend::new(raw)),
        }
    }

    pub fn reasoner(&self) -> Reasoner {
        Reasoner::new(self.db.clone(), &ReasoningConfig::default())
    }

    pub async fn user(&self, email: &str) -> i64 {
        let profile = NewUser {
            email: email.to_string(),
            name: "Test User".to_string(),
            ..Default::default()
        };
        self.db.create_user(&profile).await.unwrap().id
    }

    /// Stores a check-in one hour before `now`.
    pub async fn checkin(&self, user_id: i64, now: DateTime<Utc>, data: NewCheckIn) {
        let checkin = CheckIn::new(user_id, data, now - Duration::hours(1));
        self.db.create_checkin(&checkin).await.unwrap();
    }

    /// Stores a quiz one hour before `now` with the given stress and
    /// motivation; other dimensions default.
    pub async fn quiz(&self, user_id: i64, now: DateTime<Utc>, stress: i32, motivation: i32) {
        let responses = HashMap::from([
            ("stress".to_string(), stress),
            ("motivation".to_string(), motivation),
        ]);
        let quiz = QuizResponse::score(user_id, responses, now - Duration::hours(1));
        self.db.create_quiz(&quiz).await.unwrap();
    }
}

pub fn checkin(sleep_hours: f64, mood_score: i32, adherence: f64, energy: f64) -> NewCheckIn {
    NewCheckIn {
        sleep_hours: Some(sleep_hours),
        mood_score: Some(mood_score),
        adherence: Some(adherence),
        energy: Some(energy),
        appetite: Some(5.0),
        ..Default::default()
    }
}
