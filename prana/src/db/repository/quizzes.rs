use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::QuizResponse;

use super::{from_db_time, to_db_time};

pub struct QuizRepository;

const QUIZ_COLUMNS: &str = "id, user_id, date, stress, anxiety, motivation, mindfulness, \
                            appetite_indicator, sleep_quality, total_score, responses";

impl QuizRepository {
    pub async fn create(conn: &Connection, quiz: &QuizResponse) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO quiz_responses (
                id, user_id, date, stress, anxiety, motivation, mindfulness,
                appetite_indicator, sleep_quality, total_score, responses
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                quiz.id.clone(),
                quiz.user_id,
                to_db_time(&quiz.date),
                quiz.stress,
                quiz.anxiety,
                quiz.motivation,
                quiz.mindfulness,
                quiz.appetite_indicator,
                quiz.sleep_quality,
                quiz.total_score,
                serde_json::to_string(&quiz.responses)?,
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn latest(conn: &Connection, user_id: i64) -> Result<Option<QuizResponse>> {
        Ok(Self::recent(conn, user_id, 1).await?.into_iter().next())
    }

    pub async fn recent(conn: &Connection, user_id: i64, limit: u32) -> Result<Vec<QuizResponse>> {
        let rows = conn
            .query(
                &format!(
                    "SELECT {QUIZ_COLUMNS} FROM quiz_responses WHERE user_id = ?1 \
                     ORDER BY date DESC, rowid DESC LIMIT ?2"
                ),
                params![user_id, limit as i64],
            )
            .await?;
        Self::collect(rows).await
    }

    pub async fn since(
        conn: &Connection,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<QuizResponse>> {
        let rows = conn
            .query(
                &format!(
                    "SELECT {QUIZ_COLUMNS} FROM quiz_responses WHERE user_id = ?1 AND date >= ?2 \
                     ORDER BY date ASC, rowid ASC"
                ),
                params![user_id, to_db_time(&since)],
            )
            .await?;
        Self::collect(rows).await
    }

    async fn collect(mut rows: libsql::Rows) -> Result<Vec<QuizResponse>> {
        let mut quizzes = Vec::new();
        while let Some(row) = rows.next().await? {
            quizzes.push(Self::row_to_quiz(&row)?);
        }
        Ok(quizzes)
    }

    fn row_to_quiz(row: &libsql::Row) -> Result<QuizResponse> {
        Ok(QuizResponse {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: from_db_time(&row.get::<String>(2)?),
            stress: row.get(3)?,
            anxiety: row.get(4)?,
            motivation: row.get(5)?,
            mindfulness: row.get(6)?,
            appetite_indicator: row.get(7)?,
            sleep_quality: row.get(8)?,
            total_score: row.get(9)?,
            responses: serde_json::from_str(&row.get::<String>(10)?).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::setup_test_db;
    use chrono::Duration;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_latest_and_recent_ordering() {
        let (_dir, conn) = setup_test_db().await;
        let now = Utc::now();

        let first = QuizResponse::score(
            4,
            HashMap::from([("stress".to_string(), 90)]),
            now - Duration::hours(5),
        );
        let second = QuizResponse::score(
            4,
            HashMap::from([("stress".to_string(), 20)]),
            now,
        );
        QuizRepository::create(&conn, &first).await.unwrap();
        QuizRepository::create(&conn, &second).await.unwrap();

        let latest = QuizRepository::latest(&conn, 4).await.unwrap().unwrap();
        assert_eq!(latest.stress, 20);
        assert_eq!(latest.responses.get("stress"), Some(&20));

        let recent = QuizRepository::recent(&conn, 4, 5).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[1].id, first.id);

        let since = QuizRepository::since(&conn, 4, now - Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(since.len(), 1);
    }
}
