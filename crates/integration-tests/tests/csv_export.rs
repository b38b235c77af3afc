//! Countries export: one line per listed country, Korean headers, spreadsheet-safe.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde_json::json;

use vacance_admin::models::{EntityDocument, EntityFilter, EntityRecord};
use vacance_admin::routes::exports::CountryCsvRow;
use vacance_admin::services::csv_export::{UTF8_BOM, render};
use vacance_admin::services::export_filename;
use vacance_core::DocumentId;

fn country(id: &str, value: serde_json::Value) -> EntityDocument {
    let record: EntityRecord = serde_json::from_value(value).unwrap();
    EntityDocument {
        id: DocumentId::new(id),
        record: record.normalize(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn countries() -> Vec<EntityDocument> {
    vec![
        country(
            "kr",
            json!({"nameKo": "대한민국", "nameEn": "Korea, Republic of", "code": "KR",
                   "continent": "Asia", "status": "published"}),
        ),
        country(
            "fr",
            json!({"nameKo": "프랑스", "nameEn": "France", "code": "FR",
                   "continent": "Europe", "status": "active"}),
        ),
        country(
            "pe",
            json!({"nameKo": "페루", "code": "PE", "continent": "South America",
                   "status": "draft"}),
        ),
    ]
}

fn export(documents: &[EntityDocument], counts: &HashMap<String, i64>) -> Vec<String> {
    let rows: Vec<_> = documents
        .iter()
        .map(|document| CountryCsvRow::new(document, counts))
        .collect();
    let csv = render(&rows);
    assert!(csv.starts_with(UTF8_BOM));
    csv.trim_start_matches(UTF8_BOM)
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn every_listed_country_becomes_one_line_in_list_order() {
    let counts = HashMap::from([("kr".to_string(), 12), ("fr".to_string(), 4)]);
    let lines = export(&countries(), &counts);

    assert_eq!(
        lines,
        [
            "국가명,영문명,국가코드,대륙,도시 수,상태",
            "대한민국,\"Korea, Republic of\",KR,Asia,12,published",
            "프랑스,France,FR,Europe,4,active",
            "페루,,PE,South America,0,draft",
        ]
    );
}

#[test]
fn export_respects_the_active_filter() {
    let filter = EntityFilter {
        continent: Some("Europe".to_string()),
        ..EntityFilter::default()
    };
    let lines = export(&filter.apply(countries()), &HashMap::new());

    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("프랑스,"));
}

#[test]
fn empty_list_exports_only_the_header() {
    let lines = export(&[], &HashMap::new());
    assert_eq!(lines, ["국가명,영문명,국가코드,대륙,도시 수,상태"]);
}

#[test]
fn download_name_carries_the_date() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    assert_eq!(export_filename("countries", date), "countries_2026-03-01.csv");
}
