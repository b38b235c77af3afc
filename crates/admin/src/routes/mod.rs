//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//! GET  /health/ready                    - Readiness (database reachable)
//!
//! # Auth
//! POST /api/auth/login                  - Email + password login
//! POST /api/auth/logout                 - Logout
//! GET  /api/auth/me                     - Current admin, effective permissions, navigation
//!
//! # Navigation
//! GET  /api/navigation                  - Menu tree visible to the session
//! GET  /api/menus                       - Full menu registry (admin_mgmt:view)
//!
//! # Admin accounts (admin_mgmt)
//! GET|POST /api/admin-accounts
//! GET|PUT|DELETE /api/admin-accounts/{id}
//! POST /api/admin-accounts/preview-role - Apply the super-role rule to a form draft
//!
//! # Content library (content_library)
//! GET|POST /api/content-library
//! GET|PUT|DELETE /api/content-library/{id}
//! POST /api/content-library/resolve     - 0/1/many lookup per descriptor
//!
//! # Entities (permission = collection menu + verb)
//! GET|POST /api/entities/{collection}
//! GET|PUT|DELETE /api/entities/{collection}/{id}
//! POST /api/entities/{collection}/{id}/gallery
//! GET  /api/exports/countries.csv
//!
//! # Reference data and media
//! GET  /api/reference/countries
//! GET  /api/reference/cities?countryId=
//! POST /api/uploads/images              - Multipart `file`
//! POST /api/uploads/images/url          - Pasted link
//! GET  /media/*                         - Stored images
//! ```

pub mod admin_accounts;
pub mod auth;
pub mod content_library;
pub mod entities;
pub mod exports;
pub mod health;
pub mod navigation;
pub mod reference;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// All API routes. Uploads are capped at `max_upload_bytes` per file.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(navigation::router())
        .merge(admin_accounts::router())
        .merge(content_library::router())
        .merge(entities::router())
        .merge(exports::router())
        .merge(reference::router())
        .merge(uploads::router(max_upload_bytes))
}
