use std::collections::HashMap;

use chrono::NaiveDate;
use libsql::{params, Connection};

use crate::error::Result;

pub struct ApiUsageRepository;

impl ApiUsageRepository {
    pub async fn get(conn: &Connection, api: &str, user_id: i64, day: NaiveDate) -> Result<u32> {
        let mut rows = conn
            .query(
                "SELECT calls FROM api_usage WHERE api_name = ?1 AND user_id = ?2 AND day = ?3",
                params![api, user_id, day.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)?.max(0) as u32),
            None => Ok(0),
        }
    }

    pub async fn increment(
        conn: &Connection,
        api: &str,
        user_id: i64,
        day: NaiveDate,
    ) -> Result<u32> {
        conn.execute(
            "INSERT INTO api_usage (api_name, user_id, day, calls) VALUES (?1, ?2, ?3, 1)
             ON CONFLICT(api_name, user_id, day) DO UPDATE SET calls = calls + 1",
            params![api, user_id, day.to_string()],
        )
        .await?;

        Self::get(conn, api, user_id, day).await
    }

    pub async fn for_users(
        conn: &Connection,
        api: &str,
        user_ids: &[i64],
        day: NaiveDate,
    ) -> Result<HashMap<i64, u32>> {
        let mut counts: HashMap<i64, u32> = user_ids.iter().map(|id| (*id, 0)).collect();
        if user_ids.is_empty() {
            return Ok(counts);
        }

        let placeholders = (0..user_ids.len())
            .map(|i| format!("?{}", i + 3))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT user_id, calls FROM api_usage WHERE api_name = ?1 AND day = ?2 \
             AND user_id IN ({placeholders})"
        );

        let mut values: Vec<libsql::Value> = vec![
            libsql::Value::from(api.to_string()),
            libsql::Value::from(day.to_string()),
        ];
        values.extend(user_ids.iter().map(|id| libsql::Value::from(*id)));

        let mut rows = conn.query(&sql, libsql::params_from_iter(values)).await?;
        while let Some(row) = rows.next().await? {
            let user_id: i64 = row.get(0)?;
            let calls = row.get::<i64>(1)?.max(0) as u32;
            counts.insert(user_id, calls);
        }

        Ok(counts)
    }
}
