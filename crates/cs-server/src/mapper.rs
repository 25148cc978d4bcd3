//! Row to wire-format mapping.

use chrono::DateTime;
use cs_core::protocol::RemoteRecord;
use cs_infra::db::models::clipboard_record::DbClipboardRecord;

pub fn to_remote_record(row: DbClipboardRecord) -> RemoteRecord {
    RemoteRecord {
        id: row.id,
        content: row.content,
        device_id: row.device_id,
        timestamp: DateTime::from_timestamp_millis(row.created_at).unwrap_or(DateTime::UNIX_EPOCH),
    }
}

/// Human-readable UTC timestamp for the history page.
pub fn format_timestamp(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}
