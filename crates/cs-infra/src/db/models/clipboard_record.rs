use crate::db::schema::clipboard_records;
use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = clipboard_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbClipboardRecord {
    /// Autoincrement surrogate key; reflects true arrival order.
    pub id: i64,

    /// Device that published this record.
    pub device_id: String,

    pub content: String,

    /// Arrival time, Unix epoch milliseconds. Informational only: device
    /// clocks may be skewed, so ordering always goes through `id`.
    pub created_at: i64,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = clipboard_records)]
pub struct NewClipboardRecord {
    pub device_id: String,
    pub content: String,
    pub created_at: i64,
}
