//! Account edit form state and the super-role rule.
//!
//! Choosing the super admin role rewrites the in-memory matrix to full access at
//! once, and the matrix stays locked while that role is selected. Switching back to
//! another role keeps the materialized grants; the editor must revoke them by hand.

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::matrix::PermissionMatrix;
use super::menu::is_known_menu;
use crate::types::AdminRole;

/// Why a permission checkbox could not be changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionEditError {
    /// Super admin permissions are fixed to full access.
    #[error("permissions of a super admin cannot be edited")]
    Locked,
    /// The menu id is not in the registry.
    #[error("unknown menu id: {0}")]
    UnknownMenu(String),
}

/// The role and permission part of an account edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountForm {
    role: AdminRole,
    permissions: PermissionMatrix,
}

impl AccountForm {
    /// Load a form from stored values, applying the super-role rule immediately.
    #[must_use]
    pub fn new(role: AdminRole, permissions: PermissionMatrix) -> Self {
        let mut form = Self { role, permissions };
        form.set_role(role);
        form
    }

    #[must_use]
    pub const fn role(&self) -> AdminRole {
        self.role
    }

    #[must_use]
    pub const fn permissions(&self) -> &PermissionMatrix {
        &self.permissions
    }

    /// Whether the permission checkboxes must be rendered disabled.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }

    /// Change the selected role.
    pub fn set_role(&mut self, role: AdminRole) {
        self.role = role;
        if role == AdminRole::SuperAdmin {
            self.permissions = PermissionMatrix::full_access();
        }
    }

    /// Toggle one checkbox.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionEditError::Locked`] while the role is super admin and
    /// [`PermissionEditError::UnknownMenu`] for ids outside the registry.
    pub fn set_permission(
        &mut self,
        menu_id: &str,
        action: Action,
        granted: bool,
    ) -> Result<(), PermissionEditError> {
        if self.is_locked() {
            return Err(PermissionEditError::Locked);
        }
        if !is_known_menu(menu_id) {
            return Err(PermissionEditError::UnknownMenu(menu_id.to_owned()));
        }
        self.permissions.set(menu_id, action, granted);
        Ok(())
    }

    /// Replace the whole matrix, as submitted by a client.
    ///
    /// Ignored for super admins: their stored matrix is always the full grant.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionEditError::UnknownMenu`] naming the first unregistered id.
    pub fn replace_permissions(
        &mut self,
        submitted: PermissionMatrix,
    ) -> Result<(), PermissionEditError> {
        if let Some(unknown) = submitted.unknown_menus().first() {
            return Err(PermissionEditError::UnknownMenu((*unknown).to_owned()));
        }
        if !self.is_locked() {
            self.permissions = submitted;
        }
        Ok(())
    }

    /// The role and matrix to persist.
    #[must_use]
    pub fn finish(self) -> (AdminRole, PermissionMatrix) {
        (self.role, self.permissions)
    }
}
