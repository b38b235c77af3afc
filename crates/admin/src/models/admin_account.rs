//! Admin account domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vacance_core::rbac::{AccountForm, PermissionMatrix};
use vacance_core::{AccountStatus, AdminAccountId, AdminRole, Email};

/// An admin account (domain type).
///
/// The email is the login identity and never changes after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    pub id: AdminAccountId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    pub status: AccountStatus,
    /// Stored matrix. For super admins this is the materialized full grant.
    pub permissions: PermissionMatrix,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminAccount {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Registration form payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdminAccountInput {
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub permissions: PermissionMatrix,
    pub password: String,
}

/// Edit form payload. There is no email field: the login identity is immutable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdminAccountUpdate {
    pub name: String,
    pub role: AdminRole,
    pub status: AccountStatus,
    #[serde(default)]
    pub permissions: PermissionMatrix,
    /// New password, when the editor resets it.
    #[serde(default)]
    pub password: Option<String>,
}

/// Role and matrix after the super-role rule, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    pub role: AdminRole,
    pub permissions: PermissionMatrix,
}

impl RoleGrant {
    /// Run a submitted role and matrix through [`AccountForm`].
    ///
    /// # Errors
    ///
    /// Returns the form's error when the matrix names an unregistered menu.
    pub fn from_submission(
        role: AdminRole,
        permissions: PermissionMatrix,
    ) -> Result<Self, vacance_core::rbac::PermissionEditError> {
        let mut form = AccountForm::new(AdminRole::Marketer, PermissionMatrix::new());
        form.replace_permissions(permissions)?;
        form.set_role(role);
        let (role, permissions) = form.finish();
        Ok(Self { role, permissions })
    }
}
