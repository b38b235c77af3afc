//! Repository tests against a real `PostgreSQL`.
//!
//! Run with `VACANCE_DATABASE_URL=... cargo test -p vacance-integration-tests -- --ignored`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::json;

use vacance_admin::db::{
    AdminAccountRepository, Collection, ContentLibraryRepository, DocumentRepository,
    RepositoryError,
};
use vacance_admin::models::{AdminAccountInput, ContentObjectInput, EntityRecord};
use vacance_admin::services::{AdminAuthError, AdminAuthService};
use vacance_core::library::{ContentType, LibraryResolution};
use vacance_core::rbac::PermissionMatrix;
use vacance_core::{AccountStatus, AdminRole, DocumentId};
use vacance_integration_tests::migrated_pool;

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn super_admin_is_stored_with_full_access_and_can_log_in() {
    let pool = migrated_pool().await;
    let auth = AdminAuthService::new(&pool);
    let email = format!("{}@vacance.kr", unique("admin"));

    let account = auth
        .register(AdminAccountInput {
            email: email.clone(),
            name: "Kim".to_string(),
            role: AdminRole::SuperAdmin,
            status: AccountStatus::Active,
            permissions: PermissionMatrix::new(),
            password: "correct horse battery".to_string(),
        })
        .await
        .unwrap();
    assert!(account.permissions.is_full_access());

    let logged_in = auth.login(&email, "correct horse battery").await.unwrap();
    assert_eq!(logged_in.id, account.id);

    let wrong = auth.login(&email, "tr0ub4dor&3").await.unwrap_err();
    assert!(matches!(wrong, AdminAuthError::InvalidCredentials));

    AdminAccountRepository::new(&pool)
        .delete(&account.id)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn duplicate_library_objects_are_kept_and_resolve_as_ambiguous() {
    let pool = migrated_pool().await;
    let repo = ContentLibraryRepository::new(&pool);
    let target = DocumentId::new(unique("country"));

    let input: ContentObjectInput = serde_json::from_value(json!({
        "type": "country-story",
        "targetId": target.as_str(),
        "title": "Spring in Kyoto",
    }))
    .unwrap();

    let first = repo.create(&input, "일본").await.unwrap();
    let matches = repo
        .find_by_type_and_target(ContentType::CountryStory, &target)
        .await
        .unwrap();
    assert!(matches!(
        LibraryResolution::from_matches(matches.iter().map(|o| o.candidate()).collect()),
        LibraryResolution::AutoLinked { .. }
    ));

    let second = repo.create(&input, "일본").await.unwrap();
    let matches = repo
        .find_by_type_and_target(ContentType::CountryStory, &target)
        .await
        .unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].id, first.id);
    assert!(matches!(
        LibraryResolution::from_matches(matches.iter().map(|o| o.candidate()).collect()),
        LibraryResolution::Ambiguous { .. }
    ));

    repo.delete(&first.id).await.unwrap();
    repo.delete(&second.id).await.unwrap();
    assert!(matches!(
        repo.delete(&second.id).await,
        Err(RepositoryError::NotFound)
    ));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn documents_round_trip_and_count_cities_per_country() {
    let pool = migrated_pool().await;
    let repo = DocumentRepository::new(&pool);
    let country_id = unique("country");

    let country: EntityRecord = serde_json::from_value(json!({
        "nameKo": "포르투갈",
        "code": "PT",
        "continent": "Europe",
        "heroStory": {"headline": "Lisbon by tram"},
    }))
    .unwrap();
    let stored = repo.insert(Collection::Countries, &country).await.unwrap();
    assert_eq!(stored.data, country);

    let mut cities = Vec::new();
    for name in ["리스본", "포르투"] {
        let city: EntityRecord = serde_json::from_value(json!({
            "nameKo": name,
            "location": {"countryId": country_id},
        }))
        .unwrap();
        cities.push(repo.insert(Collection::Cities, &city).await.unwrap());
    }

    let count = repo
        .count_by_field(Collection::Cities, &["location", "countryId"], &country_id)
        .await
        .unwrap();
    assert_eq!(count, 2);

    let grouped = repo
        .count_grouped_by_field(Collection::Cities, &["location", "countryId"])
        .await
        .unwrap();
    assert_eq!(grouped.get(&country_id), Some(&2));

    for city in cities {
        repo.delete(Collection::Cities, &city.id).await.unwrap();
    }
    repo.delete(Collection::Countries, &stored.id).await.unwrap();
    let gone = repo
        .get::<EntityRecord>(Collection::Countries, &stored.id)
        .await
        .unwrap();
    assert!(gone.is_none());
}
