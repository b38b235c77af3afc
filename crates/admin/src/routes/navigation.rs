//! Menu tree endpoints.

use axum::{Json, Router, routing::get};

use vacance_core::rbac::{Action, MenuDescriptor, MenuNode, menu_registry, visible_menus};

use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, authorize};
use crate::state::AppState;

/// Menu id guarding account management, including the full registry.
pub const ADMIN_MENU: &str = "admin_mgmt";

/// Build the navigation router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/navigation", get(navigation))
        .route("/api/menus", get(menus))
}

/// The menus the signed-in admin may see.
///
/// GET /api/navigation
async fn navigation(RequireAdminAuth(admin): RequireAdminAuth) -> Json<Vec<MenuNode>> {
    Json(visible_menus(&admin.access()))
}

/// The whole registry, for the permission editor.
///
/// GET /api/menus
async fn menus(
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Json<&'static [MenuDescriptor]>, AppError> {
    authorize(&admin, ADMIN_MENU, Action::View)?;
    Ok(Json(menu_registry()))
}
