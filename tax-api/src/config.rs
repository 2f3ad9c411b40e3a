//! Server configuration from command-line flags or environment variables.

use clap::Parser;
use tax_core::db::DbConfig;

use crate::auth::AdminCredentials;

/// Personal income tax HTTP service.
#[derive(Parser, Clone)]
#[command(name = "tax-api")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Settings store backend
    #[arg(long, env = "DB_BACKEND", default_value = "sqlite")]
    pub db_backend: String,

    /// Settings store location (file path, sqlx URL or :memory:)
    #[arg(long, env = "DATABASE_URL", default_value = "ktaxes.db")]
    pub database_url: String,

    /// Username accepted on /admin routes
    #[arg(long, env = "ADMIN_USERNAME", default_value = "adminTax")]
    pub admin_username: String,

    /// Password accepted on /admin routes
    #[arg(long, env = "ADMIN_PASSWORD", default_value = "admin!", hide_env_values = true)]
    pub admin_password: String,
}

impl Config {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.db_backend.clone(),
            connection_string: self.database_url.clone(),
        }
    }

    pub fn admin_credentials(&self) -> AdminCredentials {
        AdminCredentials::new(&self.admin_username, &self.admin_password)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("db_backend", &self.db_backend)
            .field("database_url", &self.database_url)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[REDACTED]")
            .finish()
    }
}
