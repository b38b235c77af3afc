//! Authentication route handlers.
//!
//! Password login stores a [`CurrentAdmin`] snapshot in the session. Role and
//! permission edits made after that take effect at the next login.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use vacance_core::rbac::{MenuNode, PermissionMatrix, effective_permissions, visible_menus};

use crate::error::{AppError, clear_sentry_user};
use crate::middleware::{RequireAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::AdminAuthService;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The signed-in admin with everything the client needs to gate its UI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub admin: CurrentAdmin,
    /// Resolved flags for every registered menu.
    pub effective_permissions: PermissionMatrix,
    pub navigation: Vec<MenuNode>,
}

impl From<CurrentAdmin> for SessionResponse {
    fn from(admin: CurrentAdmin) -> Self {
        let access = admin.access();
        Self {
            effective_permissions: effective_permissions(&access),
            navigation: visible_menus(&access),
            admin,
        }
    }
}

fn session_error(e: &tower_sessions::session::Error) -> AppError {
    AppError::Internal(format!("session: {e}"))
}

/// Sign in with email and password.
///
/// POST /api/auth/login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let account = AdminAuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;
    let admin = CurrentAdmin::from(&account);

    session.cycle_id().await.map_err(|e| session_error(&e))?;
    set_current_admin(&session, &admin)
        .await
        .map_err(|e| session_error(&e))?;

    tracing::info!(admin_id = %admin.id, role = %admin.role, "Admin signed in");
    Ok(Json(admin.into()))
}

/// Sign out and drop the session.
///
/// POST /api/auth/logout
async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_admin(&session)
        .await
        .map_err(|e| session_error(&e))?;
    session.flush().await.map_err(|e| session_error(&e))?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The current admin.
///
/// GET /api/auth/me
async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> Json<SessionResponse> {
    Json(admin.into())
}
