//! Server-side clipboard store.
//!
//! Append-only: rows are created on every publish and never updated or
//! deleted. Ordering comes from the autoincrement surrogate key, never from
//! the (possibly skewed) device timestamps.

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use crate::db::dao::clipboard_record as dao;
use crate::db::models::clipboard_record::{DbClipboardRecord, NewClipboardRecord};
use crate::db::pool::DbPool;

/// Number of records returned by [`ClipboardStore::recent`] when the caller
/// does not name a limit.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// Server-side cap on history queries; no caller may request unbounded
/// history.
pub const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed input; surfaced to the caller as a 4xx-equivalent.
    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] anyhow::Error),
}

/// Durable record store backing the web service.
///
/// `append` is safe under concurrent calls from many devices: rows are
/// independent inserts needing only SQLite's own insert atomicity, and no
/// transaction spans multiple operations.
#[derive(Clone)]
pub struct ClipboardStore {
    pool: DbPool,
}

impl ClipboardStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::pool::PooledSqliteConnection, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::Database(anyhow::Error::new(e)))
    }

    /// Insert a new record and return its id. Existing rows are never
    /// touched.
    pub fn append(&self, device_id: &str, content: &str) -> Result<i64, StoreError> {
        if content.is_empty() || device_id.is_empty() {
            return Err(StoreError::Validation(
                "Missing content or device_id".to_string(),
            ));
        }

        let record = NewClipboardRecord {
            device_id: device_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now().timestamp_millis(),
        };

        let mut conn = self.conn()?;
        let id = dao::insert_clipboard_record(&mut conn, &record)?;
        debug!(id, device_id, "appended clipboard record");
        Ok(id)
    }

    /// Newest record for a device, by arrival order. `Ok(None)` when the
    /// device has no records yet.
    pub fn latest_for(&self, device_id: &str) -> Result<Option<DbClipboardRecord>, StoreError> {
        if device_id.is_empty() {
            return Err(StoreError::Validation("Missing device_id".to_string()));
        }

        let mut conn = self.conn()?;
        Ok(dao::latest_record_for_device(&mut conn, device_id)?)
    }

    /// Up to `limit` records, newest first, optionally filtered by device.
    /// `None` falls back to [`DEFAULT_HISTORY_LIMIT`]; anything above
    /// [`MAX_HISTORY_LIMIT`] is clamped.
    pub fn recent(
        &self,
        device_id: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<DbClipboardRecord>, StoreError> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT);

        let mut conn = self.conn()?;
        Ok(dao::query_clipboard_records(&mut conn, device_id, limit)?)
    }
}
