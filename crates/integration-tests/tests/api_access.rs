//! HTTP-level checks of authentication, permission enforcement and uploads.
//!
//! None of these requests reach the database: they are answered by the session,
//! the guard or the media validator first.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;

use vacance_core::AdminRole;
use vacance_core::rbac::{ActionFlags, PermissionMatrix};
use vacance_integration_tests::{TestApp, json_body, png_bytes, text_body};

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

fn museums_viewer() -> PermissionMatrix {
    let mut matrix = PermissionMatrix::new();
    matrix.set_flags(
        "museums",
        ActionFlags {
            view: true,
            ..ActionFlags::NONE
        },
    );
    matrix
}

#[tokio::test]
async fn health_needs_no_session() {
    let app = TestApp::new();
    let response = app.get("/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, "ok");
}

#[tokio::test]
async fn api_routes_require_a_session() {
    let app = TestApp::new();

    for path in [
        "/api/auth/me",
        "/api/navigation",
        "/api/entities/museums",
        "/api/content-library",
        "/api/exports/countries.csv",
    ] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn me_reports_effective_permissions_and_navigation() {
    let app = TestApp::new();
    let cookie = app
        .sign_in(AdminRole::ContentManager, museums_viewer())
        .await;

    let response = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["admin"]["role"], "content_manager");
    assert_eq!(body["effectivePermissions"]["museums"]["view"], true);
    assert_eq!(body["effectivePermissions"]["museums"]["delete"], false);
    assert_eq!(body["effectivePermissions"]["admin_mgmt"]["view"], false);
    assert_eq!(body["navigation"][0]["id"], "content");
    assert_eq!(body["navigation"][0]["children"][0]["id"], "museums");
}

#[tokio::test]
async fn navigation_is_filtered_by_the_matrix() {
    let app = TestApp::new();
    let cookie = app.sign_in(AdminRole::Marketer, museums_viewer()).await;

    let body = json_body(app.get("/api/navigation", Some(&cookie)).await).await;
    let menus = body.as_array().unwrap();
    assert_eq!(menus.len(), 1);
    assert_eq!(menus[0]["children"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn super_admin_sees_every_menu() {
    let app = TestApp::new();
    let cookie = app
        .sign_in(AdminRole::SuperAdmin, PermissionMatrix::new())
        .await;

    let nav = json_body(app.get("/api/navigation", Some(&cookie)).await).await;
    let registry = json_body(app.get("/api/menus", Some(&cookie)).await).await;
    assert_eq!(nav, registry);
}

#[tokio::test]
async fn menu_registry_requires_admin_management() {
    let app = TestApp::new();
    let cookie = app
        .sign_in(AdminRole::ContentManager, museums_viewer())
        .await;

    let response = app.get("/api/menus", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn entity_routes_are_guarded_per_collection() {
    let app = TestApp::new();
    let cookie = app
        .sign_in(AdminRole::ContentManager, museums_viewer())
        .await;

    let forbidden = app.get("/api/entities/restaurants", Some(&cookie)).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let unknown = app.get("/api/entities/hotels", Some(&cookie)).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let create = app
        .post_json(
            "/api/entities/museums",
            Some(&cookie),
            &json!({ "nameKo": "루브르 박물관" }),
        )
        .await;
    assert_eq!(create.status(), StatusCode::FORBIDDEN);

    let export = app
        .get("/api/exports/countries.csv", Some(&cookie))
        .await;
    assert_eq!(export.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn preview_role_applies_the_super_role_rule() {
    let app = TestApp::new();
    let cookie = app
        .sign_in(AdminRole::SuperAdmin, PermissionMatrix::new())
        .await;

    let promoted = app
        .post_json(
            "/api/admin-accounts/preview-role",
            Some(&cookie),
            &json!({ "role": "super_admin", "permissions": {} }),
        )
        .await;
    assert_eq!(promoted.status(), StatusCode::OK);
    let body = json_body(promoted).await;
    assert_eq!(body["locked"], true);
    assert_eq!(body["permissions"]["admin_mgmt"]["delete"], true);

    let demoted = json_body(
        app.post_json(
            "/api/admin-accounts/preview-role",
            Some(&cookie),
            &json!({ "role": "marketer", "permissions": body["permissions"] }),
        )
        .await,
    )
    .await;
    assert_eq!(demoted["locked"], false);
    assert_eq!(demoted["permissions"]["admin_mgmt"]["delete"], true);

    let unknown = app
        .post_json(
            "/api/admin-accounts/preview-role",
            Some(&cookie),
            &json!({ "role": "marketer", "permissions": { "hotels": { "view": true } } }),
        )
        .await;
    assert_eq!(unknown.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn uploaded_png_is_stored_as_webp_and_served_by_url() {
    let app = TestApp::new();
    let cookie = app.sign_in(AdminRole::Marketer, PermissionMatrix::new()).await;

    let response = app
        .post_file("/api/uploads/images", &cookie, "image/png", &png_bytes(40, 30))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    let url = body["url"].as_str().unwrap();
    let name = url.rsplit('/').next().unwrap();
    assert!(name.ends_with(".webp"));

    let stored = std::fs::read(app.media_dir.join(name)).unwrap();
    assert!(stored.starts_with(b"RIFF"));
    assert_eq!(&stored[8..12], b"WEBP");
}

#[tokio::test]
async fn oversized_upload_is_rejected_before_storage() {
    let app = TestApp::new();
    let cookie = app.sign_in(AdminRole::Marketer, PermissionMatrix::new()).await;

    let mut bytes = PNG_HEADER.to_vec();
    bytes.resize(6 * 1024 * 1024, 0);
    let response = app
        .post_file("/api/uploads/images", &cookie, "image/png", &bytes)
        .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!app.media_dir.exists() || std::fs::read_dir(&app.media_dir).unwrap().next().is_none());
}

#[tokio::test]
async fn file_just_over_the_limit_is_rejected() {
    let app = TestApp::new();
    let cookie = app.sign_in(AdminRole::Marketer, PermissionMatrix::new()).await;

    let mut bytes = PNG_HEADER.to_vec();
    bytes.resize(5 * 1024 * 1024 + 1, 0);
    let response = app
        .post_file("/api/uploads/images", &cookie, "image/png", &bytes)
        .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn unsupported_image_types_are_rejected() {
    let app = TestApp::new();
    let cookie = app.sign_in(AdminRole::Marketer, PermissionMatrix::new()).await;

    let bmp = app
        .post_file("/api/uploads/images", &cookie, "image/bmp", b"BM\0\0\0\0")
        .await;
    assert_eq!(bmp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let disguised = app
        .post_file("/api/uploads/images", &cookie, "image/png", b"<svg></svg>")
        .await;
    assert_eq!(disguised.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let truncated = app
        .post_file("/api/uploads/images", &cookie, "image/png", PNG_HEADER)
        .await;
    assert_eq!(truncated.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn pasted_urls_must_point_at_images() {
    let app = TestApp::new();
    let cookie = app.sign_in(AdminRole::Marketer, PermissionMatrix::new()).await;

    let accepted = app
        .post_json(
            "/api/uploads/images/url",
            Some(&cookie),
            &json!({ "url": "https://cdn.vacance.kr/paris/eiffel.JPG" }),
        )
        .await;
    assert_eq!(accepted.status(), StatusCode::OK);
    assert_eq!(
        json_body(accepted).await["url"],
        "https://cdn.vacance.kr/paris/eiffel.JPG"
    );

    for url in ["https://cdn.vacance.kr/paris/page.html", "ftp://cdn.vacance.kr/a.png"] {
        let rejected = app
            .post_json("/api/uploads/images/url", Some(&cookie), &json!({ "url": url }))
            .await;
        assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY, "{url}");
    }
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new();
    let cookie = app.sign_in(AdminRole::Marketer, museums_viewer()).await;

    let response = app
        .post_json("/api/auth/logout", Some(&cookie), &json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let me = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}
