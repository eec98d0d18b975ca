//! Recent-activity log.
//!
//! Every navigation into a tool page appends an entry; the table is pruned
//! to the 10 newest rows on insert so it behaves as a ring buffer.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::db::StoreError;

/// Maximum entries kept in the activity log.
pub const HISTORY_CAP: usize = 10;

/// One visit to a tool page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub module: String,
    pub date: String,
    pub time: String,
}

/// Append a visit and evict everything beyond the cap (oldest first).
pub fn record_visit(
    conn: &Connection,
    module: &str,
    date: &str,
    time: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO activity_history (module, visit_date, visit_time)
         VALUES (?1, ?2, ?3)",
        params![module, date, time],
    )?;
    conn.execute(
        "DELETE FROM activity_history
         WHERE id NOT IN (
             SELECT id FROM activity_history ORDER BY id DESC LIMIT ?1
         )",
        [HISTORY_CAP as i64],
    )?;
    Ok(())
}

/// Fetch the log, newest first.
pub fn recent_visits(conn: &Connection) -> Result<Vec<ActivityEntry>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT module, visit_date, visit_time
         FROM activity_history ORDER BY id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ActivityEntry {
            module: row.get(0)?,
            date: row.get(1)?,
            time: row.get(2)?,
        })
    })?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}
