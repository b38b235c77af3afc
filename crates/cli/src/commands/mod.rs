//! CLI subcommand implementations.

pub mod admin;
pub mod menus;
pub mod migrate;

use secrecy::SecretString;
use thiserror::Error;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid command-line value.
    #[error("Invalid {0}: {1}")]
    InvalidArgument(&'static str, String),

    /// Account creation was refused.
    #[error("Account error: {0}")]
    Account(#[from] vacance_admin::services::AdminAuthError),
}

/// Database URL from `VACANCE_DATABASE_URL`, falling back to `DATABASE_URL`.
pub fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();
    std::env::var("VACANCE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("VACANCE_DATABASE_URL"))
}
