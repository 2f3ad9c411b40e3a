use async_trait::async_trait;

use super::repository::{RepositoryError, SettingsRepository};

/// Where the deduction settings live.
///
/// `backend` picks a registered [`RepositoryFactory`] (matched without
/// regard to case or surrounding whitespace). `connection_string` is handed
/// to that factory as is; for `sqlite` it is a file path, an sqlx URL or
/// `:memory:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DbConfig {
    /// A throwaway in-memory SQLite store.
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// Opens a settings store for one backend.
///
/// `create` returns a store that is ready to serve: schema applied and the
/// default caps seeded where the backend supports it.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SettingsRepository>, RepositoryError>;
}

/// The settings store backends a binary was built with.
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: Vec<Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a backend. A later factory with the same name takes over.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories
            .retain(|existing| existing.backend_name() != factory.backend_name());
        self.factories.push(factory);
    }

    /// Registered backend names in registration order.
    pub fn backends(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.backend_name()).collect()
    }

    /// Opens the store named by `config.backend`.
    ///
    /// Fails with [`RepositoryError::Configuration`] when no such backend is
    /// registered; otherwise returns whatever the factory returns.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SettingsRepository>, RepositoryError> {
        let wanted = config.backend.trim();
        let factory = self
            .factories
            .iter()
            .find(|f| f.backend_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                RepositoryError::Configuration(format!(
                    "no settings store backend named '{}' (registered: {})",
                    wanted,
                    self.backends().join(", ")
                ))
            })?;

        factory.create(config).await
    }
}
