//! Schemaless document store for domain entities.
//!
//! Each [`Collection`] is a logical group of JSON documents in the shared
//! `vacance.document` table. Writes are last-write-wins: there is no version check.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use sqlx::PgPool;
use sqlx::types::Json;

use vacance_core::DocumentId;
use vacance_core::library::TargetKind;

use super::RepositoryError;

/// A logical collection of domain documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Countries,
    Cities,
    Landmarks,
    Museums,
    Restaurants,
    GolfCourses,
    Shopping,
    Magazines,
}

impl Collection {
    pub const ALL: [Self; 8] = [
        Self::Countries,
        Self::Cities,
        Self::Landmarks,
        Self::Museums,
        Self::Restaurants,
        Self::GolfCourses,
        Self::Shopping,
        Self::Magazines,
    ];

    /// Path segment used by the API (`/api/entities/{slug}`).
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Countries => "countries",
            Self::Cities => "cities",
            Self::Landmarks => "landmarks",
            Self::Museums => "museums",
            Self::Restaurants => "restaurants",
            Self::GolfCourses => "golf-courses",
            Self::Shopping => "shopping",
            Self::Magazines => "magazines",
        }
    }

    /// Value of the `collection` column.
    #[must_use]
    pub const fn storage_name(self) -> &'static str {
        match self {
            Self::Countries => "countries",
            Self::Cities => "cities",
            Self::Landmarks => "poi_master",
            Self::Museums => "museums",
            Self::Restaurants => "restaurants",
            Self::GolfCourses => "golf_courses",
            Self::Shopping => "shopping",
            Self::Magazines => "jeudi_magazine",
        }
    }

    /// The menu whose permissions guard this collection.
    #[must_use]
    pub const fn menu_id(self) -> &'static str {
        match self {
            Self::Countries => "countries",
            Self::Cities => "cities",
            Self::Landmarks => "landmarks",
            Self::Museums => "museums",
            Self::Restaurants => "restaurants",
            Self::GolfCourses => "golf_courses",
            Self::Shopping => "shopping",
            Self::Magazines => "magazine",
        }
    }

    /// Look up a collection by its API slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

impl From<TargetKind> for Collection {
    fn from(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Country => Self::Countries,
            TargetKind::City => Self::Cities,
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Internal row type for document queries.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Json<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A decoded document.
#[derive(Debug, Clone)]
pub struct StoredDocument<T> {
    pub id: DocumentId,
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T: DeserializeOwned> TryFrom<DocumentRow> for StoredDocument<T> {
    type Error = RepositoryError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let data = serde_json::from_value(row.data.0).map_err(|e| {
            RepositoryError::DataCorruption(format!("document {} does not decode: {e}", row.id))
        })?;

        Ok(Self {
            id: DocumentId::new(row.id),
            data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for schemaless documents.
pub struct DocumentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DocumentRepository<'a> {
    /// Create a new document repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every document of a collection, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a document does not decode.
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<StoredDocument<T>>, RepositoryError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data, created_at, updated_at FROM vacance.document \
             WHERE collection = $1 ORDER BY created_at DESC, id",
        )
        .bind(collection.storage_name())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get one document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the document does not decode.
    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument<T>>, RepositoryError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data, created_at, updated_at FROM vacance.document \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection.storage_name())
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a new document under a generated id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert<T: Serialize + DeserializeOwned>(
        &self,
        collection: Collection,
        data: &T,
    ) -> Result<StoredDocument<T>, RepositoryError> {
        let id = DocumentId::generate();
        let row = sqlx::query_as::<_, DocumentRow>(
            "INSERT INTO vacance.document (collection, id, data) VALUES ($1, $2, $3) \
             RETURNING id, data, created_at, updated_at",
        )
        .bind(collection.storage_name())
        .bind(id.as_str())
        .bind(Json(data))
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Replace a document's data wholesale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the document doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn replace<T: Serialize + DeserializeOwned>(
        &self,
        collection: Collection,
        id: &DocumentId,
        data: &T,
    ) -> Result<StoredDocument<T>, RepositoryError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "UPDATE vacance.document SET data = $3, updated_at = NOW() \
             WHERE collection = $1 AND id = $2 \
             RETURNING id, data, created_at, updated_at",
        )
        .bind(collection.storage_name())
        .bind(id.as_str())
        .bind(Json(data))
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the document doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, collection: Collection, id: &DocumentId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM vacance.document WHERE collection = $1 AND id = $2")
            .bind(collection.storage_name())
            .bind(id.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Count documents whose field at `path` equals `value`.
    ///
    /// `path` is a JSON path such as `["location", "countryId"]`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_field(
        &self,
        collection: Collection,
        path: &[&str],
        value: &str,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM vacance.document \
             WHERE collection = $1 AND data #>> $2 = $3",
        )
        .bind(collection.storage_name())
        .bind(path)
        .bind(value)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Count documents grouped by the field at `path`.
    ///
    /// Documents without the field are not counted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_grouped_by_field(
        &self,
        collection: Collection,
        path: &[&str],
    ) -> Result<HashMap<String, i64>, RepositoryError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT data #>> $2 AS key, COUNT(*) FROM vacance.document \
             WHERE collection = $1 AND data #>> $2 IS NOT NULL \
             GROUP BY key",
        )
        .bind(collection.storage_name())
        .bind(path)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
