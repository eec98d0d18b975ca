//! Local doctor-directory state: hidden ids and the signed-in doctor's
//! own profile edits.
//!
//! Hiding is a client-side exclusion list only — the backend keeps the
//! record; this client just stops showing it.

use std::collections::HashSet;

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::db::StoreError;

/// Local edits to the signed-in doctor's profile. Fields are `None` until
/// first saved; `timings` is the "start - end" range string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileOverrides {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub hospital_name: Option<String>,
    pub address: Option<String>,
    pub timings: Option<String>,
}

impl ProfileOverrides {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.specialization.is_none()
            && self.hospital_name.is_none()
            && self.address.is_none()
            && self.timings.is_none()
    }
}

/// Add a doctor id to the hidden set (idempotent).
pub fn hide_doctor(conn: &Connection, doctor_id: i64) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR IGNORE INTO hidden_doctors (doctor_id) VALUES (?1)",
        [doctor_id],
    )?;
    Ok(())
}

/// Check whether a doctor id is locally hidden.
pub fn is_hidden(conn: &Connection, doctor_id: i64) -> Result<bool, StoreError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM hidden_doctors WHERE doctor_id = ?1",
        [doctor_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// All locally hidden doctor ids.
pub fn hidden_ids(conn: &Connection) -> Result<HashSet<i64>, StoreError> {
    let mut stmt = conn.prepare("SELECT doctor_id FROM hidden_doctors")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(ids)
}

/// Save profile overrides (singleton row).
pub fn save_overrides(conn: &Connection, overrides: &ProfileOverrides) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE profile_overrides
            SET name = ?1, specialization = ?2, hospital_name = ?3,
                address = ?4, timings = ?5, updated_at = datetime('now')
          WHERE id = 1",
        params![
            overrides.name,
            overrides.specialization,
            overrides.hospital_name,
            overrides.address,
            overrides.timings,
        ],
    )?;
    Ok(())
}

/// Load profile overrides. All-`None` fields mean nothing has been edited.
pub fn load_overrides(conn: &Connection) -> Result<ProfileOverrides, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name, specialization, hospital_name, address, timings
         FROM profile_overrides WHERE id = 1",
    )?;
    stmt.query_row([], |row| {
        Ok(ProfileOverrides {
            name: row.get(0)?,
            specialization: row.get(1)?,
            hospital_name: row.get(2)?,
            address: row.get(3)?,
            timings: row.get(4)?,
        })
    })
    .map_err(StoreError::from)
}
