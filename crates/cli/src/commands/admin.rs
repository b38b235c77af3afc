//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! vacance-cli admin create -e admin@vacance.kr -n "Admin Name" -r super_admin -p '<password>'
//! ```

use vacance_admin::db::create_pool;
use vacance_admin::models::AdminAccountInput;
use vacance_admin::services::AdminAuthService;
use vacance_core::rbac::PermissionMatrix;
use vacance_core::{AccountStatus, AdminAccountId, AdminRole};

use super::{CommandError, database_url};

/// Create an active admin account.
///
/// Super admins are stored with the full permission matrix; other roles start
/// with no grants and are configured from the dashboard.
///
/// # Errors
///
/// Returns an error for an unknown role, an invalid email or short password, a
/// duplicate email, or a database failure.
pub async fn create(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<AdminAccountId, CommandError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| CommandError::InvalidArgument("role", role.to_owned()))?;

    let url = database_url()?;
    tracing::info!("Connecting to database...");
    let pool = create_pool(&url).await?;

    let account = AdminAuthService::new(&pool)
        .register(AdminAccountInput {
            email: email.to_owned(),
            name: name.to_owned(),
            role,
            status: AccountStatus::Active,
            permissions: PermissionMatrix::new(),
            password: password.to_owned(),
        })
        .await?;

    tracing::info!(
        "Admin account created! ID: {}, Email: {}, Role: {}",
        account.id,
        account.email,
        account.role
    );
    Ok(account.id)
}
