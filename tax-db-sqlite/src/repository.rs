use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Row, sqlite::SqlitePool, sqlite::SqliteRow};
use tax_core::{DeductionConfig, RepositoryError, SettingsRepository};
use tracing::{debug, info};

use crate::decimal::{amount_to_f64, get_amount};

/// Primary key of the single settings row.
pub const DEDUCTION_CONFIG_ID: i64 = 1;

const SELECT_CONFIG: &str = "SELECT id, personal, kreceipt, created_at, updated_at
     FROM tax_deduction_configs WHERE id = ?";

const UPSERT_PERSONAL: &str = "INSERT INTO tax_deduction_configs (id, personal, kreceipt, created_at, updated_at)
     VALUES (?, ?, 0, ?, ?)
     ON CONFLICT(id) DO UPDATE SET personal = excluded.personal, updated_at = excluded.updated_at
     RETURNING id, personal, kreceipt, created_at, updated_at";

const UPSERT_K_RECEIPT: &str = "INSERT INTO tax_deduction_configs (id, personal, kreceipt, created_at, updated_at)
     VALUES (?, 0, ?, ?, ?)
     ON CONFLICT(id) DO UPDATE SET kreceipt = excluded.kreceipt, updated_at = excluded.updated_at
     RETURNING id, personal, kreceipt, created_at, updated_at";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(seed = %path.display(), "seed file applied");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn upsert(
        &self,
        statement: &str,
        amount: Decimal,
    ) -> Result<DeductionConfig, RepositoryError> {
        let now = Utc::now();
        let row = sqlx::query(statement)
            .bind(DEDUCTION_CONFIG_ID)
            .bind(amount_to_f64(amount))
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row_to_deduction_config(&row)
    }
}

fn row_to_deduction_config(row: &SqliteRow) -> Result<DeductionConfig, RepositoryError> {
    Ok(DeductionConfig {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        personal: get_amount(row, "personal")?,
        k_receipt: get_amount(row, "kreceipt")?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {}", e)))?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get updated_at: {}", e)))?,
    })
}

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn get_deduction_config(&self) -> Result<DeductionConfig, RepositoryError> {
        let row = sqlx::query(SELECT_CONFIG)
            .bind(DEDUCTION_CONFIG_ID)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        match row {
            Some(row) => row_to_deduction_config(&row),
            None => {
                debug!("no deduction config stored, reporting unset caps");
                Ok(DeductionConfig::unset(Utc::now()))
            }
        }
    }

    async fn update_personal_deduction(
        &self,
        amount: Decimal,
    ) -> Result<DeductionConfig, RepositoryError> {
        let config = self.upsert(UPSERT_PERSONAL, amount).await?;
        info!(personal = %config.personal, "personal deduction updated");
        Ok(config)
    }

    async fn update_k_receipt_deduction(
        &self,
        amount: Decimal,
    ) -> Result<DeductionConfig, RepositoryError> {
        let config = self.upsert(UPSERT_K_RECEIPT, amount).await?;
        info!(k_receipt = %config.k_receipt, "k-receipt deduction updated");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn setup_test_db() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations()
            .await
            .expect("Failed to run migrations");
        repo
    }

    async fn seeded_test_db() -> SqliteRepository {
        let repo = setup_test_db().await;
        repo.run_seeds(Path::new("./seeds"))
            .await
            .expect("Should run seeds successfully");
        repo
    }

    async fn count_rows(repo: &SqliteRepository) -> i64 {
        sqlx::query("SELECT COUNT(*) AS n FROM tax_deduction_configs")
            .fetch_one(repo.pool())
            .await
            .expect("Failed to count rows")
            .get("n")
    }

    // ===== get_deduction_config =====

    #[tokio::test]
    async fn test_get_config_without_row_reports_unset_caps() {
        let repo = setup_test_db().await;

        let config = repo
            .get_deduction_config()
            .await
            .expect("Should read config");

        assert_eq!(config.personal, Decimal::ZERO);
        assert_eq!(config.k_receipt, Decimal::ZERO);
        assert_eq!(count_rows(&repo).await, 0);
    }

    #[tokio::test]
    async fn test_get_config_after_seeds() {
        let repo = seeded_test_db().await;

        let config = repo
            .get_deduction_config()
            .await
            .expect("Should read config");

        assert_eq!(config.id, DEDUCTION_CONFIG_ID);
        assert_eq!(config.personal, dec!(60000));
        assert_eq!(config.k_receipt, dec!(50000));
    }

    // ===== update_personal_deduction =====

    #[tokio::test]
    async fn test_update_personal_keeps_k_receipt() {
        let repo = seeded_test_db().await;

        let updated = repo
            .update_personal_deduction(dec!(70000))
            .await
            .expect("Should update personal deduction");

        assert_eq!(updated.personal, dec!(70000));
        assert_eq!(updated.k_receipt, dec!(50000));
        assert_eq!(
            repo.get_deduction_config().await.expect("Should read config"),
            updated
        );
    }

    #[tokio::test]
    async fn test_update_personal_creates_missing_row() {
        let repo = setup_test_db().await;

        let updated = repo
            .update_personal_deduction(dec!(45000.5))
            .await
            .expect("Should insert personal deduction");

        assert_eq!(updated.id, DEDUCTION_CONFIG_ID);
        assert_eq!(updated.personal, dec!(45000.5));
        assert_eq!(updated.k_receipt, Decimal::ZERO);
        assert_eq!(count_rows(&repo).await, 1);
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at_only() {
        let repo = seeded_test_db().await;
        let before = repo.get_deduction_config().await.expect("Should read config");

        let updated = repo
            .update_personal_deduction(dec!(80000))
            .await
            .expect("Should update personal deduction");

        assert_eq!(updated.created_at, before.created_at);
        assert!(updated.updated_at >= before.updated_at);
    }

    // ===== update_k_receipt_deduction =====

    #[tokio::test]
    async fn test_update_k_receipt_keeps_personal() {
        let repo = seeded_test_db().await;

        let updated = repo
            .update_k_receipt_deduction(dec!(20000))
            .await
            .expect("Should update k-receipt deduction");

        assert_eq!(updated.personal, dec!(60000));
        assert_eq!(updated.k_receipt, dec!(20000));
    }

    #[tokio::test]
    async fn test_updates_never_add_rows() {
        let repo = setup_test_db().await;

        repo.update_k_receipt_deduction(dec!(10000))
            .await
            .expect("Should insert k-receipt deduction");
        repo.update_personal_deduction(dec!(90000))
            .await
            .expect("Should update personal deduction");
        let last = repo
            .update_k_receipt_deduction(dec!(15000))
            .await
            .expect("Should update k-receipt deduction");

        assert_eq!(count_rows(&repo).await, 1);
        assert_eq!(last.personal, dec!(90000));
        assert_eq!(last.k_receipt, dec!(15000));
    }

    // ===== seeds =====

    #[tokio::test]
    async fn test_run_seeds_preserves_admin_changes() {
        let repo = seeded_test_db().await;
        repo.update_personal_deduction(dec!(100000))
            .await
            .expect("Should update personal deduction");

        repo.run_seeds(Path::new("./seeds"))
            .await
            .expect("Should rerun seeds");

        let config = repo.get_deduction_config().await.expect("Should read config");
        assert_eq!(config.personal, dec!(100000));
        assert_eq!(count_rows(&repo).await, 1);
    }

    #[tokio::test]
    async fn test_run_seeds_nonexistent_directory() {
        let repo = setup_test_db().await;

        let result = repo.run_seeds(Path::new("./nonexistent")).await;

        let err = result.expect_err("Should fail for nonexistent directory");
        assert_eq!(
            err.to_string(),
            "Failed to read seeds directory './nonexistent'"
        );
    }
}
