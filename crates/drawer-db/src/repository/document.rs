//! # Document Repository
//!
//! One JSON document per user key. Writes are whole-document and the newest
//! `saved_at` wins; fields are never merged.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(key, doc @ t2)                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT ... ON CONFLICT(user_key) DO UPDATE ...                         │
//! │       WHERE excluded.saved_at_ms >= drawer_documents.saved_at_ms        │
//! │       │                                                                 │
//! │       ├── stored @ t1 <= t2 ──► replaced       SaveOutcome::Saved       │
//! │       └── stored @ t3 >  t2 ──► left alone     SaveOutcome::Stale       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use drawer_core::UserDocument;

/// Result of a conditional save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved,
    /// A newer document was already stored; nothing was written.
    Stale,
}

/// A document as stored, with its write metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub user_key: String,
    pub document: UserDocument,
    pub device_id: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    user_key: String,
    payload: String,
    device_id: Option<String>,
    saved_at_ms: i64,
}

impl TryFrom<DocumentRow> for StoredDocument {
    type Error = DbError;

    fn try_from(row: DocumentRow) -> DbResult<Self> {
        let saved_at = DateTime::<Utc>::from_timestamp_millis(row.saved_at_ms).ok_or_else(|| {
            DbError::InvalidPayload(format!("saved_at_ms out of range: {}", row.saved_at_ms))
        })?;
        let mut document = UserDocument::from_json(&row.payload)?;
        document.saved_at = Some(saved_at);

        Ok(StoredDocument {
            user_key: row.user_key,
            document,
            device_id: row.device_id,
            saved_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Loads the document for `user_key`, if one was ever saved.
    pub async fn load(&self, user_key: &str) -> DbResult<Option<StoredDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT user_key, payload, device_id, saved_at_ms
            FROM drawer_documents
            WHERE user_key = ?1
            "#,
        )
        .bind(user_key)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let stored = StoredDocument::try_from(row).map_err(|e| {
                    warn!(user_key = %user_key, error = %e, "Stored document is unreadable");
                    e
                })?;
                debug!(
                    user_key = %user_key,
                    revision = stored.document.revision,
                    "Document loaded"
                );
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }

    /// Saves `document` unless a newer one is already stored.
    ///
    /// The timestamp is `document.saved_at`, or now when unset. Ties go to
    /// the incoming write.
    pub async fn save(
        &self,
        user_key: &str,
        document: &UserDocument,
        device_id: Option<&str>,
    ) -> DbResult<SaveOutcome> {
        let saved_at = document.saved_at.unwrap_or_else(Utc::now);
        let payload = document.to_json()?;
        let revision = i64::try_from(document.revision).unwrap_or(i64::MAX);

        let result = sqlx::query(
            r#"
            INSERT INTO drawer_documents (user_key, payload, revision, device_id, saved_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_key) DO UPDATE SET
                payload = excluded.payload,
                revision = excluded.revision,
                device_id = excluded.device_id,
                saved_at_ms = excluded.saved_at_ms
            WHERE excluded.saved_at_ms >= drawer_documents.saved_at_ms
            "#,
        )
        .bind(user_key)
        .bind(&payload)
        .bind(revision)
        .bind(device_id)
        .bind(saved_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        let outcome = if result.rows_affected() == 0 {
            SaveOutcome::Stale
        } else {
            SaveOutcome::Saved
        };

        debug!(
            user_key = %user_key,
            revision = document.revision,
            bytes = payload.len(),
            outcome = ?outcome,
            "Document save"
        );

        Ok(outcome)
    }

    /// Removes the document for `user_key`. Returns whether one existed.
    pub async fn delete(&self, user_key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM drawer_documents WHERE user_key = ?1")
            .bind(user_key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
