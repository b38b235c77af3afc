//! Unified error handling for the admin API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use vacance_core::library::LinkError;
use vacance_core::rbac::PermissionEditError;

use crate::db::RepositoryError;
use crate::models::content_library::ContentValidationError;
use crate::models::entity::EntityValidationError;
use crate::services::{AdminAuthError, MediaError};

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Submitted data failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Write conflicts with existing data.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Upload exceeds the configured size ceiling.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Upload is not an accepted image type.
    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<AdminAuthError> for AppError {
    fn from(e: AdminAuthError) -> Self {
        match e {
            AdminAuthError::InvalidCredentials | AdminAuthError::AccountInactive => {
                Self::Unauthorized(e.to_string())
            }
            AdminAuthError::AccountExists => Self::Conflict(e.to_string()),
            AdminAuthError::InvalidEmail(_)
            | AdminAuthError::WeakPassword(_)
            | AdminAuthError::Permissions(_) => Self::Validation(e.to_string()),
            AdminAuthError::PasswordHash => Self::Internal(e.to_string()),
            AdminAuthError::Repository(inner) => Self::Database(inner),
        }
    }
}

impl From<MediaError> for AppError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::TooLarge { .. } => Self::PayloadTooLarge(e.to_string()),
            MediaError::UnsupportedType(_) => Self::UnsupportedMedia(e.to_string()),
            MediaError::InvalidUrl(_) | MediaError::UnsupportedExtension | MediaError::Empty => {
                Self::Validation(e.to_string())
            }
            MediaError::Io(_) | MediaError::Conversion(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<PermissionEditError> for AppError {
    fn from(e: PermissionEditError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<ContentValidationError> for AppError {
    fn from(e: ContentValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<EntityValidationError> for AppError {
    fn from(e: EntityValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<LinkError> for AppError {
    fn from(e: LinkError) -> Self {
        Self::Validation(e.to_string())
    }
}

/// Set the Sentry user context from an admin account.
pub fn set_sentry_user(admin_id: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("country-123".to_string());
        assert_eq!(err.to_string(), "Not found: country-123");

        let err = AppError::Validation("nameKo is required".to_string());
        assert_eq!(err.to_string(), "Validation failed: nameKo is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Validation("test".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::PayloadTooLarge("test".to_string())),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            get_status(AppError::UnsupportedMedia("test".to_string())),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_media_errors_map_to_statuses() {
        let too_large = MediaError::TooLarge {
            size: 6 * 1024 * 1024,
            max: 5 * 1024 * 1024,
        };
        assert_eq!(AppError::from(too_large).status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            AppError::from(MediaError::UnsupportedType("image/bmp".to_string())).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            AppError::from(MediaError::UnsupportedExtension).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(MediaError::Conversion("encoder failed".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors_do_not_leak_which_part_failed() {
        let err = AppError::from(AdminAuthError::InvalidCredentials);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Unauthorized: invalid credentials");
    }

    #[test]
    fn test_repository_errors_map_to_client_statuses() {
        assert_eq!(
            AppError::from(RepositoryError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepositoryError::Conflict("email".to_string())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(RepositoryError::DataCorruption("bad".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
