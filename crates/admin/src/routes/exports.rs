//! CSV downloads of list pages.

use std::collections::HashMap;

use axum::{
    Router,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use tracing::instrument;

use vacance_core::rbac::Action;

use super::entities::{city_counts, list_filtered};
use crate::db::Collection;
use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, authorize};
use crate::models::{EntityDocument, EntityFilter};
use crate::services::csv_export::render;
use crate::services::{CsvRow, export_filename};
use crate::state::AppState;

/// Build the exports router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/exports/countries.csv", get(export_countries))
}

/// One line of the countries export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCsvRow {
    pub name_ko: String,
    pub name_en: String,
    pub code: String,
    pub continent: String,
    pub city_count: i64,
    pub status: String,
}

impl CountryCsvRow {
    /// Build the row for `document`, looking its city count up in `counts`.
    #[must_use]
    pub fn new(document: &EntityDocument, counts: &HashMap<String, i64>) -> Self {
        let record = &document.record;
        Self {
            name_ko: record.name_ko.clone(),
            name_en: record.name_en.clone().unwrap_or_default(),
            code: record.code.clone().unwrap_or_default(),
            continent: record.continent.clone().unwrap_or_default(),
            city_count: counts.get(document.id.as_str()).copied().unwrap_or(0),
            status: record.status.to_string(),
        }
    }
}

impl CsvRow for CountryCsvRow {
    fn headers() -> &'static [&'static str] {
        &["국가명", "영문명", "국가코드", "대륙", "도시 수", "상태"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.name_ko.clone(),
            self.name_en.clone(),
            self.code.clone(),
            self.continent.clone(),
            self.city_count.to_string(),
            self.status.clone(),
        ]
    }
}

/// The countries list as a spreadsheet, with the same filters and order as the page.
///
/// GET /api/exports/countries.csv
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
async fn export_countries(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(filter): Query<EntityFilter>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&admin, Collection::Countries.menu_id(), Action::View)?;
    let documents = list_filtered(&state, Collection::Countries, &filter).await?;
    let counts = city_counts(&state).await?;

    let rows: Vec<CountryCsvRow> = documents
        .iter()
        .map(|document| CountryCsvRow::new(document, &counts))
        .collect();
    let filename = export_filename(Collection::Countries.slug(), Utc::now().date_naive());
    tracing::info!(rows = rows.len(), %filename, "Countries exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        render(&rows),
    ))
}
