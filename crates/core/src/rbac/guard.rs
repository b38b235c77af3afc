//! Authorization guard.
//!
//! One pure function decides every permission question. Action buttons and the
//! navigation tree both go through [`resolve_permission`], so there is exactly one
//! place where the super-admin short-circuit and the fail-closed defaults live.

use serde::{Deserialize, Serialize};

use super::action::{Action, ActionFlags};
use super::matrix::PermissionMatrix;
use super::menu::{MenuDescriptor, MenuNode, all_menu_ids, is_known_menu, menu_registry};
use crate::types::AdminRole;

/// The permission facts about one signed-in admin.
///
/// Built once per session from the account record; later edits to the account take
/// effect on the next login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    pub role: AdminRole,
    pub permissions: PermissionMatrix,
}

impl AccessContext {
    #[must_use]
    pub const fn new(role: AdminRole, permissions: PermissionMatrix) -> Self {
        Self { role, permissions }
    }

    /// Shorthand for [`resolve_permission`].
    #[must_use]
    pub fn can(&self, menu_id: &str, action: Action) -> bool {
        resolve_permission(self, menu_id, action)
    }
}

/// Decide whether the admin may perform `action` on `menu_id`.
///
/// 1. Super admins may do anything on any registered menu.
/// 2. Otherwise the stored flag decides; a missing menu entry or unregistered menu
///    id resolves to `false`.
#[must_use]
pub fn resolve_permission(ctx: &AccessContext, menu_id: &str, action: Action) -> bool {
    if !is_known_menu(menu_id) {
        return false;
    }
    if ctx.role == AdminRole::SuperAdmin {
        return true;
    }
    ctx.permissions
        .get(menu_id)
        .is_some_and(|flags| flags.allows(action))
}

/// Build the navigation tree the admin is allowed to see.
///
/// A leaf is visible iff its own `view` resolves true. A parent is visible iff at
/// least one child is, and only its visible children are kept.
#[must_use]
pub fn visible_menus(ctx: &AccessContext) -> Vec<MenuNode> {
    filter_menus(ctx, menu_registry())
}

/// The resolved flags for every registered menu, as the client should see them.
///
/// Super admins get [`ActionFlags::ALL`] everywhere regardless of what is stored;
/// stored entries for unregistered ids are left out.
#[must_use]
pub fn effective_permissions(ctx: &AccessContext) -> PermissionMatrix {
    all_menu_ids()
        .into_iter()
        .map(|id| {
            let mut flags = ActionFlags::NONE;
            for action in Action::ALL {
                flags.set(action, resolve_permission(ctx, id, action));
            }
            (id.to_owned(), flags)
        })
        .collect()
}

fn filter_menus(ctx: &AccessContext, menus: &'static [MenuDescriptor]) -> Vec<MenuNode> {
    menus
        .iter()
        .filter_map(|menu| {
            if menu.is_leaf() {
                resolve_permission(ctx, menu.id, Action::View).then(|| MenuNode {
                    id: menu.id,
                    name: menu.name,
                    path: menu.path,
                    children: Vec::new(),
                })
            } else {
                let children = filter_menus(ctx, menu.children);
                (!children.is_empty()).then(|| MenuNode {
                    id: menu.id,
                    name: menu.name,
                    path: menu.path,
                    children,
                })
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn manager(matrix: PermissionMatrix) -> AccessContext {
        AccessContext::new(AdminRole::ContentManager, matrix)
    }

    #[test]
    fn test_super_admin_ignores_stored_matrix() {
        let mut matrix = PermissionMatrix::new();
        matrix.set_flags("admin_mgmt", ActionFlags::NONE);
        let ctx = AccessContext::new(AdminRole::SuperAdmin, matrix);
        for id in all_menu_ids() {
            for action in Action::ALL {
                assert!(ctx.can(id, action), "{id}:{action}");
            }
        }
    }

    #[test]
    fn test_effective_permissions_cover_registry_only() {
        let mut matrix = PermissionMatrix::new();
        matrix.set("museums", Action::View, true);
        matrix.set_flags("billing", ActionFlags::ALL);

        let effective = effective_permissions(&manager(matrix.clone()));
        assert_eq!(effective.len(), all_menu_ids().len());
        assert!(effective.get("billing").is_none());
        assert!(effective.get("museums").unwrap().view);
        assert!(effective.get("countries").unwrap().is_empty());

        let admin = effective_permissions(&AccessContext::new(AdminRole::SuperAdmin, matrix));
        assert!(admin.is_full_access());
    }

    #[test]
    fn test_missing_menu_entry_denies() {
        let ctx = manager(PermissionMatrix::new());
        assert!(!ctx.can("museums", Action::View));
    }

    #[test]
    fn test_unknown_menu_denies_even_with_stored_entry() {
        let mut matrix = PermissionMatrix::new();
        matrix.set_flags("billing", ActionFlags::ALL);
        assert!(!manager(matrix.clone()).can("billing", Action::View));
        let admin = AccessContext::new(AdminRole::SuperAdmin, matrix);
        assert!(!admin.can("billing", Action::View));
    }

    #[test]
    fn test_stored_flags_decide() {
        let mut matrix = PermissionMatrix::new();
        matrix.set("restaurants", Action::View, true);
        matrix.set("restaurants", Action::Update, true);
        let ctx = manager(matrix);
        assert!(ctx.can("restaurants", Action::View));
        assert!(ctx.can("restaurants", Action::Update));
        assert!(!ctx.can("restaurants", Action::Create));
        assert!(!ctx.can("restaurants", Action::Delete));
    }

    #[test]
    fn test_parent_visible_through_one_child() {
        let mut matrix = PermissionMatrix::new();
        matrix.set("museums", Action::View, true);
        matrix.set("magazine", Action::Create, true);
        let nav = visible_menus(&manager(matrix));

        assert_eq!(nav.len(), 1);
        let content = &nav[0];
        assert_eq!(content.id, "content");
        let child_ids: Vec<_> = content.children.iter().map(|c| c.id).collect();
        assert_eq!(child_ids, vec!["museums"]);
    }

    #[test]
    fn test_parent_view_flag_alone_does_not_show_parent() {
        let mut matrix = PermissionMatrix::new();
        matrix.set("content", Action::View, true);
        assert!(visible_menus(&manager(matrix)).is_empty());
    }

    #[test]
    fn test_super_admin_sees_whole_registry() {
        let nav = visible_menus(&AccessContext::new(
            AdminRole::SuperAdmin,
            PermissionMatrix::new(),
        ));
        assert_eq!(nav.len(), menu_registry().len());
    }
}
