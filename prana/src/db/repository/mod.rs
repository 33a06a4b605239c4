mod api_usage;
mod checkins;
mod memories;
mod plans;
mod quizzes;
mod traces;
mod users;

pub use api_usage::ApiUsageRepository;
pub use checkins::CheckInRepository;
pub use memories::MemoryRepository;
pub use plans::PlanRepository;
pub use quizzes::QuizRepository;
pub use traces::TraceRepository;
pub use users::UserRepository;

use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width UTC timestamps so that text comparison in SQL orders
/// chronologically.
pub(crate) fn to_db_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn from_db_time(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
pub(crate) mod test_support {
    use libsql::Connection;

    use crate::db::schema;

    /// Fresh schema on a temp file. The directory guard must outlive the
    /// connection.
    pub async fn setup_test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let db = libsql::Builder::new_local(dir.path().join("test.db"))
            .build()
            .await
            .unwrap();
        let conn = db.connect().unwrap();
        schema::init_schema(&conn).await.unwrap();
        (dir, conn)
    }
}
