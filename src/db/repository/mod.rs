pub mod directory;
pub mod history;
pub mod kv;

pub use directory::*;
pub use history::*;
pub use kv::*;

use rusqlite::Connection;

use super::StoreError;

/// Wipe every persisted row: session keys, activity log, hidden doctors,
/// profile overrides. Called on logout — the store afterwards looks exactly
/// like a fresh install.
pub fn clear_store(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "DELETE FROM session_store;
         DELETE FROM activity_history;
         DELETE FROM hidden_doctors;
         UPDATE profile_overrides
            SET name = NULL, specialization = NULL, hospital_name = NULL,
                address = NULL, timings = NULL, updated_at = NULL
          WHERE id = 1;",
    )?;
    Ok(())
}
