mod extractors;
mod routes;
mod state;
pub mod v1;

pub use routes::create_router;
pub use state::AppState;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::AppState;
    use crate::config::{Config, DatabaseConfig, IntegrationsConfig, ServerConfig};
    use crate::db::{Database, DatabaseBackend, LibSqlBackend};
    use crate::llm::LlmProvider;

    /// App state over a temp file database with no third-party keys and no
    /// LLM. Keep the guard alive for the duration of the test.
    pub async fn test_state(api_keys: Vec<String>) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prana.db");

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                api_keys,
                cors_origins: Vec::new(),
            },
            database: DatabaseConfig::local(path.to_string_lossy()),
            integrations: IntegrationsConfig::default(),
            llm: None,
            ..Config::default()
        };

        let raw_db = Database::new(&config.database).await.unwrap();
        let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));
        let llm = LlmProvider::new(config.llm.as_ref());

        let state = AppState::new(config, db, llm).unwrap();
        (dir, state)
    }
}
