//! Authentication extractors and permission checks.
//!
//! Every API handler takes [`RequireAdminAuth`] and then asks [`authorize`] about
//! the menu and action it touches. Both read the [`CurrentAdmin`] snapshot stored
//! in the session at login.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use vacance_core::rbac::Action;

use crate::error::{AppError, set_sentry_user};
use crate::models::{CurrentAdmin, session_keys};

/// Extractor that requires admin authentication.
///
/// Responds 401 when no admin is signed in.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication is required but nobody is logged in.
pub struct AdminAuthRejection;

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized: login required" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or(AdminAuthRejection)?;

        set_sentry_user(admin.id.as_str(), Some(admin.email.as_str()));
        Ok(Self(admin))
    }
}

/// Check `action` on `menu_id` for the signed-in admin.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the guard denies the action.
pub fn authorize(admin: &CurrentAdmin, menu_id: &str, action: Action) -> Result<(), AppError> {
    if admin.access().can(menu_id, action) {
        Ok(())
    } else {
        tracing::debug!(admin_id = %admin.id, menu_id, %action, "Permission denied");
        Err(AppError::Forbidden(format!("{action} on {menu_id}")))
    }
}

/// Helper to set the current admin in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use vacance_core::rbac::PermissionMatrix;
    use vacance_core::{AdminAccountId, AdminRole, Email};

    fn admin(role: AdminRole, permissions: PermissionMatrix) -> CurrentAdmin {
        CurrentAdmin {
            id: AdminAccountId::new("a1"),
            email: Email::parse("editor@vacance.kr").unwrap(),
            name: "Editor".to_string(),
            role,
            permissions,
        }
    }

    #[test]
    fn test_authorize_follows_matrix() {
        let mut matrix = PermissionMatrix::new();
        matrix.set("museums", Action::View, true);
        let editor = admin(AdminRole::ContentManager, matrix);

        assert!(authorize(&editor, "museums", Action::View).is_ok());
        let err = authorize(&editor, "museums", Action::Delete).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_super_admin_authorized_everywhere() {
        let root = admin(AdminRole::SuperAdmin, PermissionMatrix::new());
        assert!(authorize(&root, "admin_mgmt", Action::Delete).is_ok());
    }
}
