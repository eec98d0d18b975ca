//! Key/value rows of the session store.
//!
//! The client keeps its scalar session state (who is signed in, which
//! welcome greeting to show, which accounts have visited before) as plain
//! key/value rows so views can read them independently.

use rusqlite::{params, Connection};

use crate::db::StoreError;

/// Well-known keys.
pub const KEY_USER_NAME: &str = "user_name";
pub const KEY_USER_ROLE: &str = "user_role";
pub const KEY_USER_EMAIL: &str = "user_email";
pub const KEY_WELCOME_TYPE: &str = "welcome_type";

/// Per-account first-visit marker key.
pub fn visited_key(email: &str) -> String {
    format!("visited:{email}")
}

/// Get a stored value by key. Returns None if not set.
pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    let mut stmt = conn.prepare("SELECT value FROM session_store WHERE key = ?1")?;
    match stmt.query_row([key], |row| row.get::<_, String>(0)) {
        Ok(val) => Ok(Some(val)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(StoreError::from(e)),
    }
}

/// Set a value (upsert).
pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO session_store (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

/// Delete a value.
pub fn delete_value(conn: &Connection, key: &str) -> Result<(), StoreError> {
    conn.execute("DELETE FROM session_store WHERE key = ?1", [key])?;
    Ok(())
}
