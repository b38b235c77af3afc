//! Admin account management.
//!
//! Every endpoint is gated on the `admin_mgmt` menu. Role and permission
//! submissions go through the super-role rule before they are stored.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use vacance_core::rbac::{Action, PermissionMatrix};
use vacance_core::{AdminAccountId, AdminRole};

use super::navigation::ADMIN_MENU;
use crate::db::AdminAccountRepository;
use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, authorize};
use crate::models::admin_account::RoleGrant;
use crate::models::{AdminAccount, AdminAccountInput, AdminAccountUpdate};
use crate::services::AdminAuthService;
use crate::services::auth::validate_password;
use crate::state::AppState;

/// Build the admin accounts router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin-accounts",
            get(list_accounts).post(create_account),
        )
        .route("/api/admin-accounts/preview-role", post(preview_role))
        .route(
            "/api/admin-accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
}

/// A role change the editor is about to make.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePreviewRequest {
    pub role: AdminRole,
    #[serde(default)]
    pub permissions: PermissionMatrix,
}

/// What the form should show after the role change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePreviewResponse {
    pub role: AdminRole,
    pub permissions: PermissionMatrix,
    /// The permission checkboxes are read-only.
    pub locked: bool,
}

/// List all accounts.
///
/// GET /api/admin-accounts
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
async fn list_accounts(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminAccount>>, AppError> {
    authorize(&admin, ADMIN_MENU, Action::View)?;
    let accounts = AdminAccountRepository::new(state.pool()).list_all().await?;
    Ok(Json(accounts))
}

/// Create an account with its initial password.
///
/// POST /api/admin-accounts
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn create_account(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<AdminAccountInput>,
) -> Result<(StatusCode, Json<AdminAccount>), AppError> {
    authorize(&admin, ADMIN_MENU, Action::Create)?;
    require_name(&input.name)?;

    let account = AdminAuthService::new(state.pool()).register(input).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Get one account.
///
/// GET /api/admin-accounts/{id}
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
async fn get_account(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<AdminAccountId>,
) -> Result<Json<AdminAccount>, AppError> {
    authorize(&admin, ADMIN_MENU, Action::View)?;
    AdminAccountRepository::new(state.pool())
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("admin account {id}")))
}

/// Update name, role, status, permissions and optionally the password.
///
/// PUT /api/admin-accounts/{id}
#[instrument(skip_all, fields(admin_id = %admin.id, account_id = %id))]
async fn update_account(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<AdminAccountId>,
    Json(update): Json<AdminAccountUpdate>,
) -> Result<Json<AdminAccount>, AppError> {
    authorize(&admin, ADMIN_MENU, Action::Update)?;
    require_name(&update.name)?;
    let password = update.password.as_deref().filter(|p| !p.is_empty());
    if let Some(password) = password {
        validate_password(password)?;
    }

    let grant = RoleGrant::from_submission(update.role, update.permissions)?;
    let account = AdminAccountRepository::new(state.pool())
        .update(&id, update.name.trim(), &grant, update.status)
        .await?;

    if let Some(password) = password {
        AdminAuthService::new(state.pool())
            .set_password(&id, password)
            .await?;
    }

    tracing::info!(
        account_id = %account.id,
        role = %account.role,
        status = %account.status,
        "Admin account updated"
    );
    Ok(Json(account))
}

/// Delete an account. Admins cannot delete themselves.
///
/// DELETE /api/admin-accounts/{id}
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
async fn delete_account(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<AdminAccountId>,
) -> Result<StatusCode, AppError> {
    authorize(&admin, ADMIN_MENU, Action::Delete)?;
    if id == admin.id {
        return Err(AppError::Conflict(
            "cannot delete the account you are signed in with".to_string(),
        ));
    }

    AdminAccountRepository::new(state.pool()).delete(&id).await?;
    tracing::info!(account_id = %id, "Admin account deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Apply the super-role rule to a form draft without saving anything.
///
/// POST /api/admin-accounts/preview-role
async fn preview_role(
    RequireAdminAuth(admin): RequireAdminAuth,
    Json(draft): Json<RolePreviewRequest>,
) -> Result<Json<RolePreviewResponse>, AppError> {
    authorize(&admin, ADMIN_MENU, Action::View)?;
    let grant = RoleGrant::from_submission(draft.role, draft.permissions)?;
    Ok(Json(RolePreviewResponse {
        locked: grant.role == AdminRole::SuperAdmin,
        role: grant.role,
        permissions: grant.permissions,
    }))
}

fn require_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("missing required fields: name".to_string()));
    }
    Ok(())
}
