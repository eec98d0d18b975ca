//! Find-doctor IPC commands.

use std::sync::Arc;

use tauri::State;

use crate::backend::Doctor;
use crate::core_state::AppState;
use crate::db::repository::directory as directory_repo;
use crate::directory;
use crate::session::Role;

pub(crate) fn find_doctors_inner(
    state: &AppState,
    query: Option<String>,
) -> Result<Vec<Doctor>, String> {
    let user = state.require_session().map_err(|e| e.to_string())?;
    let conn = state.open_store().map_err(|e| e.to_string())?;

    let fetched = state.backend().list_doctors().map_err(|e| e.to_string())?;
    let hidden = directory_repo::hidden_ids(&conn).map_err(|e| e.to_string())?;
    let overrides = directory_repo::load_overrides(&conn).map_err(|e| e.to_string())?;

    let list = directory::assemble(fetched, &hidden, Some(&user), &overrides);
    Ok(directory::filter_query(list, query.as_deref().unwrap_or("")))
}

pub(crate) fn hide_doctor_inner(
    state: &AppState,
    doctor_id: i64,
    doctor_email: Option<String>,
) -> Result<(), String> {
    let user = state.require_session().map_err(|e| e.to_string())?;
    if user.role != Role::Admin {
        return Err("Only admins can remove doctors".into());
    }
    if doctor_email.as_deref() == Some(user.email.as_str()) {
        return Err("You cannot remove your own profile".into());
    }

    let conn = state.open_store().map_err(|e| e.to_string())?;
    directory_repo::hide_doctor(&conn, doctor_id).map_err(|e| e.to_string())?;
    tracing::info!(doctor_id, "Doctor hidden from this client");
    Ok(())
}

/// The assembled doctor listing, optionally filtered by a name or
/// specialization query.
#[tauri::command]
pub fn find_doctors(
    query: Option<String>,
    state: State<'_, Arc<AppState>>,
) -> Result<Vec<Doctor>, String> {
    find_doctors_inner(&state, query)
}

/// Hide a doctor from this client's views (admin soft delete — the backend
/// record is untouched).
#[tauri::command]
pub fn hide_doctor(
    doctor_id: i64,
    doctor_email: Option<String>,
    state: State<'_, Arc<AppState>>,
) -> Result<(), String> {
    hide_doctor_inner(&state, doctor_id, doctor_email)
}
