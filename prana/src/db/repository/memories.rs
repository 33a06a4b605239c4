use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{Memory, MemoryType};

use super::{from_db_time, to_db_time};

pub struct MemoryRepository;

const MEMORY_COLUMNS: &str = "id, user_id, memory_type, content, created_at, last_accessed";

impl MemoryRepository {
    pub async fn create(conn: &Connection, memory: &Memory) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO memories (id, user_id, memory_type, content, created_at, last_accessed)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                memory.id.clone(),
                memory.user_id,
                memory.memory_type.to_string(),
                serde_json::to_string(&memory.content)?,
                to_db_time(&memory.created_at),
                memory.last_accessed.as_ref().map(to_db_time),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn list(conn: &Connection, user_id: i64) -> Result<Vec<Memory>> {
        let rows = conn
            .query(
                &format!(
                    "SELECT {MEMORY_COLUMNS} FROM memories WHERE user_id = ?1 \
                     ORDER BY created_at DESC, rowid DESC"
                ),
                params![user_id],
            )
            .await?;
        Self::collect(rows).await
    }

    /// NULL access times sort last.
    pub async fn recent(conn: &Connection, user_id: i64, limit: u32) -> Result<Vec<Memory>> {
        let rows = conn
            .query(
                &format!(
                    "SELECT {MEMORY_COLUMNS} FROM memories WHERE user_id = ?1 \
                     ORDER BY last_accessed DESC, rowid DESC LIMIT ?2"
                ),
                params![user_id, limit as i64],
            )
            .await?;
        Self::collect(rows).await
    }

    pub async fn of_type(
        conn: &Connection,
        user_id: i64,
        memory_type: &MemoryType,
    ) -> Result<Vec<Memory>> {
        let rows = conn
            .query(
                &format!(
                    "SELECT {MEMORY_COLUMNS} FROM memories WHERE user_id = ?1 AND memory_type = ?2 \
                     ORDER BY created_at ASC, rowid ASC"
                ),
                params![user_id, memory_type.to_string()],
            )
            .await?;
        Self::collect(rows).await
    }

    async fn collect(mut rows: libsql::Rows) -> Result<Vec<Memory>> {
        let mut memories = Vec::new();
        while let Some(row) = rows.next().await? {
            memories.push(Self::row_to_memory(&row)?);
        }
        Ok(memories)
    }

    fn row_to_memory(row: &libsql::Row) -> Result<Memory> {
        Ok(Memory {
            id: row.get(0)?,
            user_id: row.get(1)?,
            memory_type: MemoryType::from(row.get::<String>(2)?),
            content: serde_json::from_str(&row.get::<String>(3)?)
                .unwrap_or(serde_json::Value::Null),
            created_at: from_db_time(&row.get::<String>(4)?),
            last_accessed: row
                .get::<Option<String>>(5)?
                .map(|value| from_db_time(&value)),
        })
    }
}
