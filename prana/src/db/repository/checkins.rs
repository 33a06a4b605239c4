use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::CheckIn;

use super::{from_db_time, to_db_time};

pub struct CheckInRepository;

const CHECKIN_COLUMNS: &str = "id, user_id, date, mood, mood_score, appetite, energy, \
                               sleep_hours, adherence, ingredients, notes";

impl CheckInRepository {
    pub async fn create(conn: &Connection, checkin: &CheckIn) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO checkins (
                id, user_id, date, mood, mood_score, appetite, energy,
                sleep_hours, adherence, ingredients, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                checkin.id.clone(),
                checkin.user_id,
                to_db_time(&checkin.date),
                checkin.mood.clone(),
                checkin.mood_score,
                checkin.appetite,
                checkin.energy,
                checkin.sleep_hours,
                checkin.adherence,
                checkin.ingredients.clone(),
                checkin.notes.clone(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn latest(conn: &Connection, user_id: i64) -> Result<Option<CheckIn>> {
        Ok(Self::recent(conn, user_id, 1).await?.into_iter().next())
    }

    pub async fn recent(conn: &Connection, user_id: i64, limit: u32) -> Result<Vec<CheckIn>> {
        let rows = conn
            .query(
                &format!(
                    "SELECT {CHECKIN_COLUMNS} FROM checkins WHERE user_id = ?1 \
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
    ) -> Result<Vec<CheckIn>> {
        let rows = conn
            .query(
                &format!(
                    "SELECT {CHECKIN_COLUMNS} FROM checkins WHERE user_id = ?1 AND date >= ?2 \
                     ORDER BY date ASC, rowid ASC"
                ),
                params![user_id, to_db_time(&since)],
            )
            .await?;
        Self::collect(rows).await
    }

    pub async fn average_adherence_since(
        conn: &Connection,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Option<f64>> {
        let mut rows = conn
            .query(
                "SELECT AVG(adherence) FROM checkins \
                 WHERE user_id = ?1 AND date >= ?2 AND adherence IS NOT NULL",
                params![user_id, to_db_time(&since)],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(row.get::<Option<f64>>(0)?),
            None => Ok(None),
        }
    }

    async fn collect(mut rows: libsql::Rows) -> Result<Vec<CheckIn>> {
        let mut checkins = Vec::new();
        while let Some(row) = rows.next().await? {
            checkins.push(Self::row_to_checkin(&row)?);
        }
        Ok(checkins)
    }

    fn row_to_checkin(row: &libsql::Row) -> Result<CheckIn> {
        Ok(CheckIn {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: from_db_time(&row.get::<String>(2)?),
            mood: row.get(3)?,
            mood_score: row.get(4)?,
            appetite: row.get(5)?,
            energy: row.get(6)?,
            sleep_hours: row.get(7)?,
            adherence: row.get(8)?,
            ingredients: row.get(9)?,
            notes: row.get(10)?,
        })
    }
}
