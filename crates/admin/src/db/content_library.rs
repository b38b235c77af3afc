//! Content library repository.
//!
//! `(content_type, target_id)` is indexed but not unique: any number of objects
//! may describe the same target.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use vacance_core::library::ContentType;
use vacance_core::{ContentObjectId, DocumentId, PublishStatus};

use super::RepositoryError;
use crate::models::content_library::{ContentObject, ContentObjectInput};

const CONTENT_COLUMNS: &str = "id, content_type, target_id, target_name, title, tagline, \
                               description, fields, keywords, status, created_at, updated_at";

/// Internal row type for content library queries.
#[derive(Debug, sqlx::FromRow)]
struct ContentObjectRow {
    id: String,
    content_type: String,
    target_id: String,
    target_name: String,
    title: String,
    tagline: Option<String>,
    description: Option<String>,
    fields: Json<serde_json::Map<String, serde_json::Value>>,
    keywords: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContentObjectRow> for ContentObject {
    type Error = RepositoryError;

    fn try_from(row: ContentObjectRow) -> Result<Self, Self::Error> {
        let content_type: ContentType = row
            .content_type
            .parse()
            .map_err(RepositoryError::DataCorruption)?;
        let status: PublishStatus = row
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("{e}")))?;

        Ok(Self {
            id: ContentObjectId::new(row.id),
            content_type,
            type_name: content_type.type_name().to_owned(),
            target_id: DocumentId::new(row.target_id),
            target_name: row.target_name,
            title: row.title,
            tagline: row.tagline,
            description: row.description,
            fields: row.fields.0,
            keywords: row.keywords,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Optional list filters.
#[derive(Debug, Clone, Default)]
pub struct ContentLibraryFilter {
    pub content_type: Option<ContentType>,
    pub target_id: Option<DocumentId>,
}

/// Repository for content library objects.
pub struct ContentLibraryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContentLibraryRepository<'a> {
    /// Create a new content library repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List objects, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(
        &self,
        filter: &ContentLibraryFilter,
    ) -> Result<Vec<ContentObject>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContentObjectRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM vacance.content_library \
             WHERE ($1::TEXT IS NULL OR content_type = $1) \
               AND ($2::TEXT IS NULL OR target_id = $2) \
             ORDER BY created_at DESC"
        ))
        .bind(filter.content_type.map(ContentType::as_str))
        .bind(filter.target_id.as_ref().map(DocumentId::as_str))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get one object.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get(&self, id: &ContentObjectId) -> Result<Option<ContentObject>, RepositoryError> {
        let row = sqlx::query_as::<_, ContentObjectRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM vacance.content_library WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Every object for a `(type, target)` pair, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn find_by_type_and_target(
        &self,
        content_type: ContentType,
        target_id: &DocumentId,
    ) -> Result<Vec<ContentObject>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContentObjectRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM vacance.content_library \
             WHERE content_type = $1 AND target_id = $2 \
             ORDER BY created_at ASC, id"
        ))
        .bind(content_type.as_str())
        .bind(target_id.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create an object. `input` must already be normalized.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        input: &ContentObjectInput,
        target_name: &str,
    ) -> Result<ContentObject, RepositoryError> {
        let row = sqlx::query_as::<_, ContentObjectRow>(&format!(
            "INSERT INTO vacance.content_library \
             (id, content_type, target_id, target_name, title, tagline, description, \
              fields, keywords, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {CONTENT_COLUMNS}"
        ))
        .bind(ContentObjectId::generate().into_inner())
        .bind(input.content_type.as_str())
        .bind(input.target_id.as_str())
        .bind(target_name)
        .bind(&input.title)
        .bind(&input.tagline)
        .bind(&input.description)
        .bind(Json(&input.fields))
        .bind(&input.keywords)
        .bind(input.status.as_str())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Replace an object's content. `input` must already be normalized.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the object doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: &ContentObjectId,
        input: &ContentObjectInput,
        target_name: &str,
    ) -> Result<ContentObject, RepositoryError> {
        let row = sqlx::query_as::<_, ContentObjectRow>(&format!(
            "UPDATE vacance.content_library \
             SET content_type = $2, target_id = $3, target_name = $4, title = $5, \
                 tagline = $6, description = $7, fields = $8, keywords = $9, \
                 status = $10, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {CONTENT_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(input.content_type.as_str())
        .bind(input.target_id.as_str())
        .bind(target_name)
        .bind(&input.title)
        .bind(&input.tagline)
        .bind(&input.description)
        .bind(Json(&input.fields))
        .bind(&input.keywords)
        .bind(input.status.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete an object. Entities that linked it keep a dangling id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the object doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: &ContentObjectId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM vacance.content_library WHERE id = $1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
