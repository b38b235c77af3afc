//! Domain entity CRUD, shared by every collection.
//!
//! The collection comes from the path; its menu id and the HTTP verb decide the
//! permission checked.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tracing::instrument;

use vacance_core::DocumentId;
use vacance_core::rbac::Action;

use crate::db::{Collection, ContentLibraryRepository, DocumentRepository};
use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, authorize};
use crate::models::{ContentObject, CurrentAdmin, EntityDocument, EntityFilter, EntityRecord};
use crate::state::AppState;

/// JSON path of a city's country reference.
pub const CITY_COUNTRY_PATH: [&str; 2] = ["location", "countryId"];

/// Build the entities router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/entities/{collection}",
            get(list_entities).post(create_entity),
        )
        .route(
            "/api/entities/{collection}/{id}",
            get(get_entity).put(update_entity).delete(delete_entity),
        )
}

/// A list row. Countries carry the number of cities pointing at them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityListItem {
    #[serde(flatten)]
    pub document: EntityDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_count: Option<i64>,
}

/// A detail view with its linked library objects resolved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDetail {
    #[serde(flatten)]
    pub document: EntityDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_count: Option<i64>,
    /// Linked objects that still exist. Dangling links are left out.
    pub linked_content: Vec<ContentObject>,
}

/// Resolve the path segment and check `action` on the collection's menu.
pub(super) fn guarded_collection(
    admin: &CurrentAdmin,
    slug: &str,
    action: Action,
) -> Result<Collection, AppError> {
    let collection = Collection::from_slug(slug)
        .ok_or_else(|| AppError::NotFound(format!("collection {slug}")))?;
    authorize(admin, collection.menu_id(), action)?;
    Ok(collection)
}

/// Filtered list of one collection, newest first.
///
/// GET /api/entities/{collection}
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
async fn list_entities(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(filter): Query<EntityFilter>,
) -> Result<Json<Vec<EntityListItem>>, AppError> {
    let collection = guarded_collection(&admin, &slug, Action::View)?;
    let documents = list_filtered(&state, collection, &filter).await?;

    let city_counts = if collection == Collection::Countries {
        Some(city_counts(&state).await?)
    } else {
        None
    };

    let items = documents
        .into_iter()
        .map(|document| EntityListItem {
            city_count: city_counts
                .as_ref()
                .map(|counts| counts.get(document.id.as_str()).copied().unwrap_or(0)),
            document,
        })
        .collect();
    Ok(Json(items))
}

/// Create an entity.
///
/// POST /api/entities/{collection}
#[instrument(skip_all, fields(admin_id = %admin.id, collection = %slug))]
async fn create_entity(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(record): Json<EntityRecord>,
) -> Result<(StatusCode, Json<EntityDocument>), AppError> {
    let collection = guarded_collection(&admin, &slug, Action::Create)?;
    let record = prepare(&state, collection, None, record).await?;

    let stored = DocumentRepository::new(state.pool())
        .insert(collection, &record)
        .await?;
    tracing::info!(%collection, id = %stored.id, "Entity created");
    Ok((StatusCode::CREATED, Json(stored.into())))
}

/// One entity with its linked library content.
///
/// GET /api/entities/{collection}/{id}
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
async fn get_entity(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, DocumentId)>,
) -> Result<Json<EntityDetail>, AppError> {
    let collection = guarded_collection(&admin, &slug, Action::View)?;
    let document: EntityDocument = DocumentRepository::new(state.pool())
        .get::<EntityRecord>(collection, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{collection} {id}")))?
        .into();

    let city_count = if collection == Collection::Countries {
        Some(
            DocumentRepository::new(state.pool())
                .count_by_field(Collection::Cities, &CITY_COUNTRY_PATH, id.as_str())
                .await?,
        )
    } else {
        None
    };

    let library = ContentLibraryRepository::new(state.pool());
    let mut linked_content = Vec::new();
    for object_id in document.record.library_links.values() {
        if let Some(object) = library.get(object_id).await? {
            linked_content.push(object);
        }
    }

    Ok(Json(EntityDetail {
        document,
        city_count,
        linked_content,
    }))
}

/// Replace an entity. Last write wins.
///
/// PUT /api/entities/{collection}/{id}
#[instrument(skip_all, fields(admin_id = %admin.id, collection = %slug, id = %id))]
async fn update_entity(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, DocumentId)>,
    Json(record): Json<EntityRecord>,
) -> Result<Json<EntityDocument>, AppError> {
    let collection = guarded_collection(&admin, &slug, Action::Update)?;
    let record = prepare(&state, collection, Some(&id), record).await?;

    let stored = DocumentRepository::new(state.pool())
        .replace(collection, &id, &record)
        .await?;
    tracing::info!(%collection, %id, "Entity updated");
    Ok(Json(stored.into()))
}

/// Delete an entity. References to it elsewhere are not touched.
///
/// DELETE /api/entities/{collection}/{id}
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
async fn delete_entity(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, DocumentId)>,
) -> Result<StatusCode, AppError> {
    let collection = guarded_collection(&admin, &slug, Action::Delete)?;
    DocumentRepository::new(state.pool())
        .delete(collection, &id)
        .await?;
    tracing::info!(%collection, %id, "Entity deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Every document of `collection` passing `filter`, newest first.
pub(super) async fn list_filtered(
    state: &AppState,
    collection: Collection,
    filter: &EntityFilter,
) -> Result<Vec<EntityDocument>, AppError> {
    let documents = DocumentRepository::new(state.pool())
        .list::<EntityRecord>(collection)
        .await?
        .into_iter()
        .map(EntityDocument::from)
        .collect();
    Ok(filter.apply(documents))
}

/// City count per country id.
pub(super) async fn city_counts(state: &AppState) -> Result<HashMap<String, i64>, AppError> {
    Ok(DocumentRepository::new(state.pool())
        .count_grouped_by_field(Collection::Cities, &CITY_COUNTRY_PATH)
        .await?)
}

/// Normalize and validate a submitted record, including its library links.
async fn prepare(
    state: &AppState,
    collection: Collection,
    own_id: Option<&DocumentId>,
    record: EntityRecord,
) -> Result<EntityRecord, AppError> {
    let record = record.normalize();
    record.validate(collection)?;

    let library = ContentLibraryRepository::new(state.pool());
    for (content_type, object_id) in &record.library_links {
        let object = library.get(object_id).await?.ok_or_else(|| {
            AppError::Validation(format!("libraryLinks.{content_type}: {object_id} does not exist"))
        })?;
        if object.content_type != *content_type {
            return Err(AppError::Validation(format!(
                "libraryLinks.{content_type}: {object_id} is a {}",
                object.content_type
            )));
        }

        let kind = content_type.target_kind();
        match record.library_link_target(collection, own_id, kind) {
            Some(target) if target == object.target_id => {}
            Some(target) => {
                return Err(AppError::Validation(format!(
                    "libraryLinks.{content_type}: {object_id} belongs to {}, not {target}",
                    object.target_id
                )));
            }
            None => {
                return Err(AppError::Validation(format!(
                    "libraryLinks.{content_type}: this entry has no {} to link to",
                    Collection::from(kind)
                )));
            }
        }
    }
    Ok(record)
}
