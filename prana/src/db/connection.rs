use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

#[derive(Clone)]
pub struct Database {
    pub(crate) db: Arc<libsql::Database>,
    pragmas: Arc<Pragmas>,
}

#[derive(Debug)]
struct Pragmas {
    busy_timeout_ms: u64,
    journal_mode: &'static str,
    synchronous: &'static str,
}

impl Database {
    /// Opens (or creates) the store described by `config` and ensures the
    /// schema exists.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = if config.url.starts_with("libsql://") || config.url.starts_with("https://") {
            if let Some(ref local_path) = config.local_path {
                Builder::new_remote_replica(
                    local_path,
                    config.url.clone(),
                    config.auth_token.clone().unwrap_or_default(),
                )
                .build()
                .await?
            } else {
                Builder::new_remote(
                    config.url.clone(),
                    config.auth_token.clone().unwrap_or_default(),
                )
                .build()
                .await?
            }
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };

        let database = Self {
            db: Arc::new(db),
            pragmas: Arc::new(Pragmas {
                busy_timeout_ms: config.busy_timeout_ms,
                journal_mode: normalize_journal_mode(&config.journal_mode),
                synchronous: normalize_synchronous(&config.synchronous),
            }),
        };
        database.configure_database().await?;
        database.init_schema().await?;

        tracing::debug!(url = %config.url, "Database ready");
        Ok(database)
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(self.db.connect()?)
    }

    /// Drops and recreates every table.
    pub async fn reset(&self) -> Result<()> {
        let conn = self.connect()?;
        schema::reset_schema(&conn).await?;
        schema::init_schema(&conn).await?;
        tracing::warn!("Database reset: all tables dropped and recreated");
        Ok(())
    }

    async fn configure_database(&self) -> Result<()> {
        let conn = self.connect()?;
        let pragmas = [
            format!("PRAGMA busy_timeout = {}", self.pragmas.busy_timeout_ms),
            format!("PRAGMA journal_mode = {}", self.pragmas.journal_mode),
            format!("PRAGMA synchronous = {}", self.pragmas.synchronous),
        ];

        for sql in pragmas {
            if let Err(error) = conn.execute_batch(&sql).await {
                tracing::warn!(pragma = %sql, error = %error, "Failed to apply SQLite pragma");
            }
        }

        Ok(())
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        schema::init_schema(&conn).await?;
        Ok(())
    }

    pub async fn sync(&self) -> Result<()> {
        if let Ok(sync) = self.db.sync().await {
            tracing::info!("Database synced: {:?}", sync);
        }
        Ok(())
    }
}

fn normalize_journal_mode(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "DELETE" => "DELETE",
        "TRUNCATE" => "TRUNCATE",
        "PERSIST" => "PERSIST",
        "MEMORY" => "MEMORY",
        "OFF" => "OFF",
        _ => "WAL",
    }
}

fn normalize_synchronous(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "OFF" => "OFF",
        "FULL" => "FULL",
        "EXTRA" => "EXTRA",
        _ => "NORMAL",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pragma_values_are_normalized() {
        assert_eq!(normalize_journal_mode(" delete "), "DELETE");
        assert_eq!(normalize_journal_mode("bogus"), "WAL");
        assert_eq!(normalize_synchronous("full"), "FULL");
        assert_eq!(normalize_synchronous(""), "NORMAL");
    }

    #[tokio::test]
    async fn test_open_local_file_and_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prana.db");
        let db = Database::new(&DatabaseConfig::local(format!(
            "file:{}",
            path.display()
        )))
        .await
        .unwrap();

        let conn = db.connect().unwrap();
        conn.execute(
            "INSERT INTO users (email, name, created_at) VALUES ('a@b.co', 'A', '2026-01-01T00:00:00+00:00')",
            (),
        )
        .await
        .unwrap();

        db.reset().await.unwrap();

        let conn = db.connect().unwrap();
        let mut rows = conn.query("SELECT COUNT(*) FROM users", ()).await.unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 0);
    }
}
