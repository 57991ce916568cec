//! Best-effort audit logging.
//!
//! Audit writes happen AFTER the business operation has committed and
//! must never undo or block it. A failed write is logged and swallowed.

use tracing::warn;

use pharma_core::NewActivityEntry;
use pharma_db::Database;

/// Appends an audit entry, swallowing any error.
pub async fn record_activity(db: &Database, entry: NewActivityEntry) {
    if let Err(e) = db.activity().record(&entry).await {
        warn!(action = %entry.action, error = %e, "Audit write failed, continuing");
    }
}

/// Convenience constructor for a create-style entry with a JSON snapshot
/// of the new record.
pub fn create_entry(
    user_id: i64,
    action: &str,
    table_name: &str,
    record_id: i64,
    new_values: Option<String>,
) -> NewActivityEntry {
    NewActivityEntry {
        user_id,
        action: action.to_string(),
        table_name: Some(table_name.to_string()),
        record_id: Some(record_id),
        new_values,
        ..Default::default()
    }
}
