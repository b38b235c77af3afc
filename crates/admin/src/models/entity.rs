//! Domain entity records: countries, cities, points of interest and magazine issues.
//!
//! The records are stored schemaless in the `document` table. The fields below are
//! the ones the API reads and validates; anything else a client sends is kept in
//! [`EntityRecord::details`] untouched (golf course specs, museum floor maps, menus).

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use vacance_core::library::{ContentType, TargetKind};
use vacance_core::{ContentObjectId, DocumentId, PriceItem, PublishStatus};

use crate::db::Collection;
use crate::db::documents::StoredDocument;

/// GPS coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Where an entity is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<DocumentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<DocumentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Image, video and audio references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Multimedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

/// Day of the week, used as the operating-hours key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

/// Opening hours for one day, `HH:MM` local time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
    #[serde(default)]
    pub closed: bool,
}

impl DayHours {
    fn is_valid(&self) -> bool {
        if self.closed {
            return true;
        }
        let parse = |t: &Option<String>| {
            t.as_deref()
                .map(|t| NaiveTime::parse_from_str(t, "%H:%M").is_ok())
        };
        matches!(
            (parse(&self.open), parse(&self.close)),
            (Some(true) | None, Some(true) | None)
        )
    }
}

/// The common shape of every domain entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    /// Korean name (the title, for magazine issues).
    #[serde(default)]
    pub name_ko: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    /// Country code, countries only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Continent or category label, countries only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(default)]
    pub media: Multimedia,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub operating_hours: BTreeMap<Weekday, DayHours>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prices: Vec<PriceItem>,
    /// Linked content library objects, one per content type.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub library_links: BTreeMap<ContentType, ContentObjectId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connected_product_ids: Vec<DocumentId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connected_artwork_ids: Vec<DocumentId>,
    /// Entity-specific blocks the API stores as-is.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Why a record cannot be saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.message())]
pub struct EntityValidationError {
    /// Required fields left empty.
    pub missing: Vec<&'static str>,
    /// Fields with unusable values.
    pub invalid: Vec<String>,
}

impl EntityValidationError {
    fn message(&self) -> String {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing required fields: {}", self.missing.join(", ")));
        }
        if !self.invalid.is_empty() {
            parts.push(format!("invalid fields: {}", self.invalid.join(", ")));
        }
        parts.join("; ")
    }

    fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

impl EntityRecord {
    /// Trim names, upper-case the country code and drop duplicate connections.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        self.name_ko = self.name_ko.trim().to_owned();
        self.name_en = self
            .name_en
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());
        self.code = self
            .code
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty());
        self.location.country_id = self
            .location
            .country_id
            .filter(|id| !id.as_str().trim().is_empty());
        self.location.city_id = self
            .location
            .city_id
            .filter(|id| !id.as_str().trim().is_empty());
        for key in SERVER_FIELDS {
            self.details.remove(*key);
        }
        dedup_ids(&mut self.connected_product_ids);
        dedup_ids(&mut self.connected_artwork_ids);
        self
    }

    /// Required-field and format checks for `collection`.
    ///
    /// # Errors
    ///
    /// Returns every problem found, not just the first.
    pub fn validate(&self, collection: Collection) -> Result<(), EntityValidationError> {
        let mut err = EntityValidationError::default();

        if self.name_ko.is_empty() {
            err.missing.push(if collection == Collection::Magazines {
                "title"
            } else {
                "nameKo"
            });
        }
        match collection {
            Collection::Countries => {
                if self.code.is_none() {
                    err.missing.push("code");
                }
            }
            Collection::Cities => {
                if self.location.country_id.is_none() {
                    err.missing.push("location.countryId");
                }
            }
            Collection::Landmarks
            | Collection::Museums
            | Collection::Restaurants
            | Collection::GolfCourses
            | Collection::Shopping => {
                if self.location.city_id.is_none() {
                    err.missing.push("location.cityId");
                }
            }
            Collection::Magazines => {}
        }

        if self.location.coordinates.is_some_and(|c| !c.is_valid()) {
            err.invalid.push("location.coordinates".to_owned());
        }
        for (day, hours) in &self.operating_hours {
            if !hours.is_valid() {
                err.invalid.push(format!("operatingHours.{}", day.as_str()));
            }
        }
        for (i, price) in self.prices.iter().enumerate() {
            if let Err(e) = price.validate() {
                err.invalid.push(format!("prices[{i}] ({e})"));
            }
        }

        if err.is_empty() { Ok(()) } else { Err(err) }
    }

    /// The country or city a library link of `kind` on this record must target.
    ///
    /// `own_id` is the record's id in `collection`, `None` before it is first saved.
    /// Returns `None` when the record has nothing of that kind to link to.
    #[must_use]
    pub fn library_link_target(
        &self,
        collection: Collection,
        own_id: Option<&DocumentId>,
        kind: TargetKind,
    ) -> Option<DocumentId> {
        match (collection, kind) {
            (Collection::Countries, TargetKind::Country) | (Collection::Cities, TargetKind::City) => {
                own_id.cloned()
            }
            (Collection::Countries, TargetKind::City) => None,
            (_, TargetKind::Country) => self.location.country_id.clone(),
            (_, TargetKind::City) => self.location.city_id.clone(),
        }
    }
}

/// Response-only keys a client may echo back; never stored.
const SERVER_FIELDS: &[&str] = &["id", "createdAt", "updatedAt", "cityCount", "linkedContent"];

fn dedup_ids(ids: &mut Vec<DocumentId>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}

/// A stored entity with its id and timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDocument {
    pub id: DocumentId,
    #[serde(flatten)]
    pub record: EntityRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredDocument<EntityRecord>> for EntityDocument {
    fn from(doc: StoredDocument<EntityRecord>) -> Self {
        Self {
            id: doc.id,
            record: doc.data,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// List-page filters. Every set field must match.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFilter {
    /// Case-insensitive substring of the Korean name, English name or code.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<PublishStatus>,
    #[serde(default)]
    pub country_id: Option<DocumentId>,
    #[serde(default)]
    pub city_id: Option<DocumentId>,
    #[serde(default)]
    pub continent: Option<String>,
}

impl EntityFilter {
    #[must_use]
    pub fn matches(&self, record: &EntityRecord) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = std::iter::once(record.name_ko.as_str())
                .chain(record.name_en.as_deref())
                .chain(record.code.as_deref())
                .any(|hay| hay.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if self
            .country_id
            .as_ref()
            .is_some_and(|id| record.location.country_id.as_ref() != Some(id))
        {
            return false;
        }
        if self
            .city_id
            .as_ref()
            .is_some_and(|id| record.location.city_id.as_ref() != Some(id))
        {
            return false;
        }
        if let Some(continent) = self.continent.as_deref().filter(|c| !c.is_empty())
            && record.continent.as_deref() != Some(continent)
        {
            return false;
        }
        true
    }

    /// Keep the documents that match, in their original order.
    #[must_use]
    pub fn apply(&self, documents: Vec<EntityDocument>) -> Vec<EntityDocument> {
        documents
            .into_iter()
            .filter(|doc| self.matches(&doc.record))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> EntityRecord {
        serde_json::from_value::<EntityRecord>(value).unwrap().normalize()
    }

    #[test]
    fn test_country_requires_name_and_code() {
        let err = record(json!({"nameEn": "France"}))
            .validate(Collection::Countries)
            .unwrap_err();
        assert_eq!(err.missing, vec!["nameKo", "code"]);
        assert_eq!(err.to_string(), "missing required fields: nameKo, code");
    }

    #[test]
    fn test_poi_requires_city() {
        let err = record(json!({"nameKo": "루브르 박물관", "location": {"countryId": "FR"}}))
            .validate(Collection::Museums)
            .unwrap_err();
        assert_eq!(err.missing, vec!["location.cityId"]);

        record(json!({"nameKo": "루브르 박물관", "location": {"cityId": "paris"}}))
            .validate(Collection::Museums)
            .unwrap();
    }

    #[test]
    fn test_library_link_targets_follow_the_page() {
        let country = DocumentId::new("FR");
        let city = record(json!({"nameKo": "파리", "location": {"countryId": "FR"}}));
        let paris = DocumentId::new("paris");

        assert_eq!(
            city.library_link_target(Collection::Cities, Some(&paris), TargetKind::City),
            Some(paris.clone())
        );
        assert_eq!(
            city.library_link_target(Collection::Cities, Some(&paris), TargetKind::Country),
            Some(country.clone())
        );
        assert_eq!(
            city.library_link_target(Collection::Cities, None, TargetKind::City),
            None
        );

        let france = record(json!({"nameKo": "프랑스", "code": "FR"}));
        assert_eq!(
            france.library_link_target(Collection::Countries, Some(&country), TargetKind::Country),
            Some(country.clone())
        );
        assert_eq!(
            france.library_link_target(Collection::Countries, Some(&country), TargetKind::City),
            None
        );

        let louvre = record(json!({
            "nameKo": "루브르 박물관",
            "location": {"countryId": "FR", "cityId": "paris"}
        }));
        assert_eq!(
            louvre.library_link_target(Collection::Museums, None, TargetKind::City),
            Some(paris)
        );
        assert_eq!(
            louvre.library_link_target(Collection::Museums, None, TargetKind::Country),
            Some(country)
        );
    }

    #[test]
    fn test_magazine_reports_title() {
        let err = record(json!({})).validate(Collection::Magazines).unwrap_err();
        assert_eq!(err.missing, vec!["title"]);
    }

    #[test]
    fn test_invalid_hours_and_prices() {
        let err = record(json!({
            "nameKo": "르 쁘띠 비스트로",
            "location": {"cityId": "paris"},
            "operatingHours": {"monday": {"open": "25:00", "close": "22:00"}},
            "prices": [{"label": "Set menu", "amount": "-1", "currency": "EUR"}]
        }))
        .validate(Collection::Restaurants)
        .unwrap_err();
        assert!(err.missing.is_empty());
        assert_eq!(err.invalid.len(), 2);
    }

    #[test]
    fn test_normalize_and_unknown_fields_survive() {
        let rec = record(json!({
            "nameKo": " 프랑스 ",
            "code": "fr",
            "connectedProductIds": ["a", "b", "a"],
            "golfSpec": {"holes": 18},
            "id": "spoofed"
        }));
        assert_eq!(rec.name_ko, "프랑스");
        assert_eq!(rec.code.as_deref(), Some("FR"));
        assert_eq!(rec.connected_product_ids.len(), 2);
        assert_eq!(rec.details["golfSpec"]["holes"], 18);
        assert!(!rec.details.contains_key("id"));

        let back = serde_json::to_value(&rec).unwrap();
        assert_eq!(back["golfSpec"]["holes"], 18);
    }

    #[test]
    fn test_filter_matches() {
        let rec = record(json!({
            "nameKo": "프랑스",
            "nameEn": "France",
            "code": "FR",
            "continent": "Europe",
            "status": "published"
        }));

        let filter = |v: Value| serde_json::from_value::<EntityFilter>(v).unwrap();
        assert!(filter(json!({"search": "fran"})).matches(&rec));
        assert!(filter(json!({"search": "fr", "status": "published"})).matches(&rec));
        assert!(!filter(json!({"status": "draft"})).matches(&rec));
        assert!(!filter(json!({"continent": "Asia"})).matches(&rec));
        assert!(!filter(json!({"search": "japan"})).matches(&rec));
    }
}
