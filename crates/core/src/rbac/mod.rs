//! Role-based access control for the admin dashboard.
//!
//! The model is deliberately flat:
//!
//! - A static [menu registry](menu) names every section of the dashboard.
//! - Each admin account stores a [`PermissionMatrix`]: menu id → four [`ActionFlags`].
//! - The [guard](guard) answers "may this admin perform `action` on `menu`?" and
//!   filters the navigation tree with the same answer.
//! - The [account form](form) keeps the stored matrix of super admins fully granted.
//!
//! Everything fails closed: an unknown menu id, a missing matrix entry or a missing
//! action flag all mean "no".

pub mod action;
pub mod form;
pub mod guard;
pub mod matrix;
pub mod menu;

pub use action::{Action, ActionFlags};
pub use form::{AccountForm, PermissionEditError};
pub use guard::{AccessContext, effective_permissions, resolve_permission, visible_menus};
pub use matrix::PermissionMatrix;
pub use menu::{MenuDescriptor, MenuNode, all_menu_ids, find_menu, is_known_menu, menu_registry};
