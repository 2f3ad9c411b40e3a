use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use tax_core::db::repository::{RepositoryError, SettingsRepository};
use tax_core::db::{DbConfig, RepositoryFactory};

use crate::repository::SqliteRepository;

/// Resolve the seeds directory at runtime so it works in both development and
/// packaged distribution.
///
/// Resolution order:
/// 1. `TAX_DB_SQLITE_SEEDS_DIR`, if set.
/// 2. `./seeds`, if the directory exists in the current working directory.
/// 3. `$CARGO_MANIFEST_DIR/seeds` when running from the build tree.
pub fn seeds_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TAX_DB_SQLITE_SEEDS_DIR") {
        return PathBuf::from(dir);
    }
    let cwd_seeds = PathBuf::from("./seeds");
    if cwd_seeds.is_dir() {
        return cwd_seeds;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
}

/// Turn a connection string into a sqlx SQLite URL.
///
/// * `":memory:"` (or empty) becomes an in-memory database.
/// * Anything already starting with `sqlite:` passes through.
/// * A bare path opens that file, creating it if needed.
pub fn connection_url(connection_string: &str) -> String {
    let trimmed = connection_string.trim();
    if trimmed.is_empty() || trimmed == ":memory:" {
        return "sqlite::memory:".to_string();
    }
    if trimmed.starts_with("sqlite:") {
        return trimmed.to_string();
    }
    format!("sqlite:{}?mode=rwc", trimmed)
}

/// [`RepositoryFactory`] for SQLite.
///
/// ```rust,no_run
/// use tax_core::db::RepositoryRegistry;
/// use tax_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database, apply migrations and seed the default caps.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SettingsRepository>, RepositoryError> {
        let url = connection_url(&config.connection_string);
        let repo = SqliteRepository::new(&url)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        let seeds = seeds_dir();
        repo.run_seeds(&seeds)
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;

        info!(%url, seeds = %seeds.display(), "sqlite settings store ready");
        Ok(Box::new(repo))
    }
}
