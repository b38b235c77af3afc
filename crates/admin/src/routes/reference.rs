//! Lookup lists for form dropdowns.
//!
//! Any signed-in admin may read these: editing a museum needs the city list even
//! without access to the cities menu.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use vacance_core::DocumentId;

use crate::db::{Collection, DocumentRepository};
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::EntityRecord;
use crate::state::AppState;

/// Build the reference data router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reference/countries", get(countries))
        .route("/api/reference/cities", get(cities))
}

/// One dropdown option.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceOption {
    pub id: DocumentId,
    pub name_ko: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<DocumentId>,
}

/// City list filter.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityQuery {
    pub country_id: Option<DocumentId>,
}

/// GET /api/reference/countries
#[instrument(skip_all)]
async fn countries(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReferenceOption>>, AppError> {
    options(&state, Collection::Countries, None).await.map(Json)
}

/// GET /api/reference/cities?countryId=
#[instrument(skip_all)]
async fn cities(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Vec<ReferenceOption>>, AppError> {
    options(&state, Collection::Cities, query.country_id.as_ref())
        .await
        .map(Json)
}

/// Options sorted by Korean name, optionally limited to one country.
async fn options(
    state: &AppState,
    collection: Collection,
    country_id: Option<&DocumentId>,
) -> Result<Vec<ReferenceOption>, AppError> {
    let mut options: Vec<ReferenceOption> = DocumentRepository::new(state.pool())
        .list::<EntityRecord>(collection)
        .await?
        .into_iter()
        .filter(|doc| country_id.is_none_or(|id| doc.data.location.country_id.as_ref() == Some(id)))
        .map(|doc| ReferenceOption {
            id: doc.id,
            name_ko: doc.data.name_ko,
            name_en: doc.data.name_en,
            code: doc.data.code,
            country_id: doc.data.location.country_id,
        })
        .collect();
    options.sort_by(|a, b| a.name_ko.cmp(&b.name_ko));
    Ok(options)
}
