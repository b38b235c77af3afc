//! Permission model tests across the account form, the guard and navigation.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use vacance_admin::models::admin_account::RoleGrant;
use vacance_core::AdminRole;
use vacance_core::rbac::{
    AccessContext, AccountForm, Action, ActionFlags, PermissionEditError, PermissionMatrix,
    all_menu_ids, effective_permissions, resolve_permission, visible_menus,
};

fn matrix(entries: &[(&str, ActionFlags)]) -> PermissionMatrix {
    let mut matrix = PermissionMatrix::new();
    for (menu_id, flags) in entries {
        matrix.set_flags(menu_id, *flags);
    }
    matrix
}

const VIEW_ONLY: ActionFlags = ActionFlags {
    view: true,
    create: false,
    update: false,
    delete: false,
};

#[test]
fn super_admin_may_do_everything_with_an_empty_matrix() {
    let ctx = AccessContext::new(AdminRole::SuperAdmin, PermissionMatrix::new());

    for menu_id in all_menu_ids() {
        for action in Action::ALL {
            assert!(resolve_permission(&ctx, menu_id, action), "{menu_id}:{action}");
        }
    }
    assert!(effective_permissions(&ctx).is_full_access());
}

#[test]
fn unknown_menus_are_denied_even_for_super_admins() {
    let super_admin = AccessContext::new(AdminRole::SuperAdmin, PermissionMatrix::full_access());
    assert!(!resolve_permission(&super_admin, "hotels", Action::View));

    let editor = AccessContext::new(AdminRole::ContentManager, PermissionMatrix::new());
    assert!(!resolve_permission(&editor, "hotels", Action::View));
}

#[test]
fn missing_flags_fail_closed() {
    let ctx = AccessContext::new(
        AdminRole::ContentManager,
        matrix(&[("museums", VIEW_ONLY)]),
    );

    assert!(ctx.can("museums", Action::View));
    assert!(!ctx.can("museums", Action::Update));
    assert!(!ctx.can("restaurants", Action::View));
}

#[test]
fn parent_menu_is_shown_only_with_a_visible_child() {
    let ctx = AccessContext::new(
        AdminRole::Marketer,
        matrix(&[("museums", VIEW_ONLY), ("content", ActionFlags::ALL)]),
    );
    let nav = visible_menus(&ctx);

    let ids: Vec<_> = nav.iter().map(|node| node.id).collect();
    assert_eq!(ids, ["content"]);
    let children: Vec<_> = nav[0].children.iter().map(|node| node.id).collect();
    assert_eq!(children, ["museums"]);

    let parent_only = AccessContext::new(
        AdminRole::Marketer,
        matrix(&[("content", ActionFlags::ALL)]),
    );
    assert!(visible_menus(&parent_only).is_empty());
}

#[test]
fn choosing_super_admin_grants_and_locks_the_matrix() {
    let mut form = AccountForm::new(AdminRole::ContentManager, PermissionMatrix::new());
    form.set_role(AdminRole::SuperAdmin);

    assert!(form.is_locked());
    assert!(form.permissions().is_full_access());
    assert_eq!(
        form.set_permission("museums", Action::Delete, false),
        Err(PermissionEditError::Locked)
    );
}

#[test]
fn switching_away_from_super_admin_keeps_the_grants() {
    let mut form = AccountForm::new(AdminRole::SuperAdmin, PermissionMatrix::new());
    form.set_role(AdminRole::Marketer);

    assert!(!form.is_locked());
    assert!(form.permissions().is_full_access());

    form.set_permission("admin_mgmt", Action::Delete, false).unwrap();
    let (role, permissions) = form.finish();
    assert_eq!(role, AdminRole::Marketer);
    assert!(!permissions.get("admin_mgmt").unwrap().delete);
}

#[test]
fn saved_super_admin_is_stored_with_full_access() {
    let grant = RoleGrant::from_submission(
        AdminRole::SuperAdmin,
        matrix(&[("museums", VIEW_ONLY)]),
    )
    .unwrap();

    assert_eq!(grant.role, AdminRole::SuperAdmin);
    assert!(grant.permissions.is_full_access());
}

#[test]
fn saving_an_unregistered_menu_is_rejected() {
    let err = RoleGrant::from_submission(
        AdminRole::ContentManager,
        matrix(&[("hotels", ActionFlags::ALL)]),
    )
    .unwrap_err();

    assert_eq!(err, PermissionEditError::UnknownMenu("hotels".to_string()));
}
