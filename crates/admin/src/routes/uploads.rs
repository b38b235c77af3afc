//! Image ingestion: standalone uploads and entity galleries.
//!
//! Requests are capped a little above the configured file size so oversized
//! uploads are refused before they are buffered.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use vacance_core::DocumentId;
use vacance_core::rbac::Action;

use super::entities::guarded_collection;
use crate::db::DocumentRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::EntityRecord;
use crate::services::{ImageGallery, ImageInput};
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the uploads router for files of at most `max_upload_bytes`.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/uploads/images", post(upload_image))
        .route("/api/uploads/images/url", post(link_image))
        .route("/api/entities/{collection}/{id}/gallery", post(add_gallery_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD))
}

/// A pasted image link.
#[derive(Debug, Deserialize)]
pub struct ImageUrlRequest {
    pub url: String,
}

/// Where the accepted image can be referenced from.
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub url: String,
}

/// The gallery after an image was appended.
#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub url: String,
    pub gallery: Vec<String>,
}

/// Store an uploaded image file.
///
/// POST /api/uploads/images
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn upload_image(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImageResponse>), AppError> {
    let input = read_image_input(multipart).await?;
    let url = state.media().ingest(input).await?;
    Ok((StatusCode::CREATED, Json(ImageResponse { url })))
}

/// Check a pasted image URL.
///
/// POST /api/uploads/images/url
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn link_image(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(body): Json<ImageUrlRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    let url = state.media().ingest(ImageInput::Url(body.url)).await?;
    Ok(Json(ImageResponse { url }))
}

/// Append an image, uploaded or linked, to an entity's gallery.
///
/// The stored gallery is only rewritten when the image is accepted, and a freshly
/// stored file is removed again when the gallery cannot be saved.
///
/// POST /api/entities/{collection}/{id}/gallery
#[instrument(skip_all, fields(admin_id = %admin.id, collection = %slug, id = %id))]
async fn add_gallery_image(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, DocumentId)>,
    multipart: Multipart,
) -> Result<Json<GalleryResponse>, AppError> {
    let collection = guarded_collection(&admin, &slug, Action::Update)?;
    let documents = DocumentRepository::new(state.pool());
    let mut record = documents
        .get::<EntityRecord>(collection, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{collection} {id}")))?
        .data;

    let input = read_image_input(multipart).await?;
    let uploaded = matches!(input, ImageInput::File { .. });
    let mut gallery = ImageGallery::new(std::mem::take(&mut record.media.gallery));
    let url = gallery.add(state.media(), input).await?.to_owned();

    record.media.gallery = gallery.into_inner();
    let stored = match documents.replace(collection, &id, &record).await {
        Ok(stored) => stored,
        Err(e) => {
            if uploaded {
                state.media().discard(&url).await;
            }
            return Err(e.into());
        }
    };
    tracing::info!(%collection, %id, images = stored.data.media.gallery.len(), "Gallery image added");

    Ok(Json(GalleryResponse {
        url,
        gallery: stored.data.media.gallery,
    }))
}

/// Read the first `file` or `url` field of a multipart form.
async fn read_image_input(mut multipart: Multipart) -> Result<ImageInput, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                return Ok(ImageInput::File {
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("url") => {
                let url = field.text().await.map_err(multipart_error)?;
                return Ok(ImageInput::Url(url));
            }
            _ => {}
        }
    }
    Err(AppError::BadRequest(
        "expected a `file` or `url` form field".to_string(),
    ))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}
