use crate::db::models::clipboard_record::{DbClipboardRecord, NewClipboardRecord};
use crate::db::schema::clipboard_records;
use anyhow::{Context, Result};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

/// Insert a clipboard record and return the id SQLite assigned to it.
pub fn insert_clipboard_record(
    conn: &mut SqliteConnection,
    record: &NewClipboardRecord,
) -> Result<i64> {
    let id = diesel::insert_into(clipboard_records::table)
        .values(record)
        .returning(clipboard_records::id)
        .get_result(conn)
        .context("Failed to insert clipboard record")?;
    Ok(id)
}

/// Newest record for a device.
///
/// Ordered by `id`, not `created_at`: the surrogate key reflects arrival
/// order even when device clocks are skewed.
pub fn latest_record_for_device(
    conn: &mut SqliteConnection,
    device_id: &str,
) -> Result<Option<DbClipboardRecord>> {
    let record = clipboard_records::table
        .filter(clipboard_records::device_id.eq(device_id))
        .order(clipboard_records::id.desc())
        .select(DbClipboardRecord::as_select())
        .first(conn)
        .optional()
        .context("Failed to query latest clipboard record")?;
    Ok(record)
}

/// Query records newest-first, optionally filtered by device.
pub fn query_clipboard_records(
    conn: &mut SqliteConnection,
    device_id: Option<&str>,
    limit: i64,
) -> Result<Vec<DbClipboardRecord>> {
    let mut query = clipboard_records::table.into_boxed();

    if let Some(device_id) = device_id {
        query = query.filter(clipboard_records::device_id.eq(device_id));
    }

    let records = query
        .order(clipboard_records::id.desc())
        .limit(limit)
        .select(DbClipboardRecord::as_select())
        .load(conn)
        .context("Failed to query clipboard records")?;

    Ok(records)
}
