//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use vacance_core::rbac::{AccessContext, PermissionMatrix};
use vacance_core::{AdminAccountId, AdminRole, Email};

use super::admin_account::AdminAccount;

/// Session-stored admin identity.
///
/// Captured at login together with the permission matrix. Edits to the account
/// take effect at the next login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAdmin {
    pub id: AdminAccountId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    pub permissions: PermissionMatrix,
}

impl CurrentAdmin {
    /// Permission context for the guard.
    #[must_use]
    pub fn access(&self) -> AccessContext {
        AccessContext::new(self.role, self.permissions.clone())
    }
}

impl From<&AdminAccount> for CurrentAdmin {
    fn from(account: &AdminAccount) -> Self {
        Self {
            id: account.id.clone(),
            email: account.email.clone(),
            name: account.name.clone(),
            role: account.role,
            permissions: account.permissions.clone(),
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
