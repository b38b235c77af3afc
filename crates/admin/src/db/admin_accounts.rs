//! Admin account repository for database operations.
//!
//! Accounts and their password hashes. Queries are built at runtime so the crate
//! compiles without a live database.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use vacance_core::rbac::PermissionMatrix;
use vacance_core::{AccountStatus, AdminAccountId, AdminRole, Email};

use super::{RepositoryError, conflict_on_unique};
use crate::models::admin_account::{AdminAccount, RoleGrant};

const ACCOUNT_COLUMNS: &str = "id, email, name, role, status, permissions, last_login_at, \
                               created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` admin account queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminAccountRow {
    id: String,
    email: String,
    name: String,
    role: String,
    status: String,
    permissions: Json<PermissionMatrix>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AdminAccountRow> for AdminAccount {
    type Error = RepositoryError;

    fn try_from(row: AdminAccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: AdminRole = row
            .role
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("{e}")))?;
        let status: AccountStatus = row
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("{e}")))?;

        Ok(Self {
            id: AdminAccountId::new(row.id),
            email,
            name: row.name,
            role,
            status,
            permissions: row.permissions.0,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for admin account database operations.
pub struct AdminAccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminAccountRepository<'a> {
    /// Create a new admin account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all admin accounts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<AdminAccount>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminAccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM vacance.admin_account ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an admin account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(
        &self,
        id: &AdminAccountId,
    ) -> Result<Option<AdminAccount>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminAccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM vacance.admin_account WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get an admin account by its email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<AdminAccount>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminAccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM vacance.admin_account WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new admin account together with its password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        grant: &RoleGrant,
        status: AccountStatus,
        password_hash: &str,
    ) -> Result<AdminAccount, RepositoryError> {
        let id = AdminAccountId::generate();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, AdminAccountRow>(&format!(
            "INSERT INTO vacance.admin_account (id, email, name, role, status, permissions) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(email.as_str())
        .bind(name)
        .bind(grant.role.as_str())
        .bind(status.as_str())
        .bind(Json(&grant.permissions))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "email already exists"))?;

        sqlx::query(
            "INSERT INTO vacance.admin_credential (admin_account_id, password_hash) \
             VALUES ($1, $2)",
        )
        .bind(id.as_str())
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    /// Update name, role, status and permissions. The email is never changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: &AdminAccountId,
        name: &str,
        grant: &RoleGrant,
        status: AccountStatus,
    ) -> Result<AdminAccount, RepositoryError> {
        let row = sqlx::query_as::<_, AdminAccountRow>(&format!(
            "UPDATE vacance.admin_account \
             SET name = $2, role = $3, status = $4, permissions = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(name)
        .bind(grant.role.as_str())
        .bind(status.as_str())
        .bind(Json(&grant.permissions))
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete an account. Its credential row goes with it (`ON DELETE CASCADE`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: &AdminAccountId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM vacance.admin_account WHERE id = $1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Get the stored password hash for an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        id: &AdminAccountId,
    ) -> Result<Option<String>, RepositoryError> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM vacance.admin_credential WHERE admin_account_id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(hash)
    }

    /// Replace the password hash for an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account has no credential row.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_password_hash(
        &self,
        id: &AdminAccountId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE vacance.admin_credential \
             SET password_hash = $2, updated_at = NOW() \
             WHERE admin_account_id = $1",
        )
        .bind(id.as_str())
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Record a successful login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn touch_last_login(&self, id: &AdminAccountId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE vacance.admin_account SET last_login_at = NOW() WHERE id = $1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
