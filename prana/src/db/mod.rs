pub mod backends;
mod connection;
pub mod repository;
pub(crate) mod schema;
pub mod traits;

pub use backends::libsql::LibSqlBackend;
pub use connection::Database;
pub use traits::*;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::{Database, DatabaseBackend, LibSqlBackend};
    use crate::config::DatabaseConfig;

    /// A migrated backend on a temp file. Keep the guard alive for the
    /// duration of the test.
    pub async fn test_backend() -> (tempfile::TempDir, Arc<dyn DatabaseBackend>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prana.db");
        let db = Database::new(&DatabaseConfig::local(path.to_string_lossy()))
            .await
            .unwrap();
        (dir, Arc::new(LibSqlBackend::new(db)))
    }
}
