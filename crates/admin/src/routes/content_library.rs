//! Content library CRUD and the reference linker.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use vacance_core::library::{ContentType, ResolutionState};
use vacance_core::rbac::Action;
use vacance_core::{ContentObjectId, DocumentId};

use crate::db::content_library::ContentLibraryFilter;
use crate::db::{Collection, ContentLibraryRepository, DocumentRepository};
use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, authorize};
use crate::models::{ContentObject, ContentObjectInput, EntityRecord};
use crate::services::{LibraryDescriptor, ResolvedSlot, resolve_target};
use crate::state::AppState;

const LIBRARY_MENU: &str = "content_library";

/// Build the content library router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/content-library",
            get(list_objects).post(create_object),
        )
        .route("/api/content-library/resolve", post(resolve))
        .route(
            "/api/content-library/{id}",
            get(get_object).put(update_object).delete(delete_object),
        )
}

/// List filters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryQuery {
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
    pub target_id: Option<DocumentId>,
}

/// A library object with the path of its management page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentObjectView {
    #[serde(flatten)]
    pub object: ContentObject,
    pub manage_path: String,
}

impl From<ContentObject> for ContentObjectView {
    fn from(object: ContentObject) -> Self {
        Self {
            manage_path: format!("/content-library/{}/edit", object.id),
            object,
        }
    }
}

/// Linker request from a detail page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    #[serde(default)]
    pub target_id: Option<DocumentId>,
    pub descriptors: Vec<LibraryDescriptor>,
    /// Links saved on the entity earlier.
    #[serde(default)]
    pub links: BTreeMap<ContentType, ContentObjectId>,
}

/// List library objects, newest first.
///
/// GET /api/content-library
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
async fn list_objects(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
) -> Result<Json<Vec<ContentObject>>, AppError> {
    authorize(&admin, LIBRARY_MENU, Action::View)?;
    let filter = ContentLibraryFilter {
        content_type: query.content_type,
        target_id: query.target_id,
    };
    let objects = ContentLibraryRepository::new(state.pool())
        .list(&filter)
        .await?;
    Ok(Json(objects))
}

/// Create a library object.
///
/// POST /api/content-library
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn create_object(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<ContentObjectInput>,
) -> Result<(StatusCode, Json<ContentObjectView>), AppError> {
    authorize(&admin, LIBRARY_MENU, Action::Create)?;
    let input = input.normalize()?;
    let target_name = target_name(&state, &input).await?;

    let object = ContentLibraryRepository::new(state.pool())
        .create(&input, &target_name)
        .await?;
    tracing::info!(
        object_id = %object.id,
        content_type = %object.content_type,
        target_id = %object.target_id,
        "Library object created"
    );
    Ok((StatusCode::CREATED, Json(object.into())))
}

/// Read-only view of one object.
///
/// GET /api/content-library/{id}
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
async fn get_object(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ContentObjectId>,
) -> Result<Json<ContentObjectView>, AppError> {
    authorize(&admin, LIBRARY_MENU, Action::View)?;
    ContentLibraryRepository::new(state.pool())
        .get(&id)
        .await?
        .map(|object| Json(object.into()))
        .ok_or_else(|| AppError::NotFound(format!("content object {id}")))
}

/// Replace an object's content.
///
/// PUT /api/content-library/{id}
#[instrument(skip_all, fields(admin_id = %admin.id, object_id = %id))]
async fn update_object(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ContentObjectId>,
    Json(input): Json<ContentObjectInput>,
) -> Result<Json<ContentObjectView>, AppError> {
    authorize(&admin, LIBRARY_MENU, Action::Update)?;
    let input = input.normalize()?;
    let target_name = target_name(&state, &input).await?;

    let object = ContentLibraryRepository::new(state.pool())
        .update(&id, &input, &target_name)
        .await?;
    Ok(Json(object.into()))
}

/// Delete an object.
///
/// DELETE /api/content-library/{id}
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
async fn delete_object(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ContentObjectId>,
) -> Result<StatusCode, AppError> {
    authorize(&admin, LIBRARY_MENU, Action::Delete)?;
    ContentLibraryRepository::new(state.pool()).delete(&id).await?;
    tracing::info!(object_id = %id, "Library object deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Resolve each requested slot for a target.
///
/// Open to every signed-in admin: entity edit pages call it whatever menus the
/// editor holds. A slot whose lookup fails reports its own error.
///
/// POST /api/content-library/resolve
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn resolve(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Json<ResolutionState<Vec<ResolvedSlot>>> {
    let repo = ContentLibraryRepository::new(state.pool());
    let slots = resolve_target(
        &repo,
        request.target_id.as_ref(),
        &request.descriptors,
        &request.links,
    )
    .await;
    Json(slots)
}

/// Look up the target document and return its display name.
///
/// The target must exist in the collection matching the type's target kind.
async fn target_name(state: &AppState, input: &ContentObjectInput) -> Result<String, AppError> {
    let collection = Collection::from(input.content_type.target_kind());
    let target = DocumentRepository::new(state.pool())
        .get::<EntityRecord>(collection, &input.target_id)
        .await?
        .ok_or_else(|| {
            AppError::Validation(format!(
                "targetId {} is not an existing {collection} entry",
                input.target_id
            ))
        })?;
    Ok(target.data.name_ko)
}
