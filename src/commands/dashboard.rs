//! Dashboard IPC commands: the role-based stats view, the activity log,
//! doctor queue actions, and the doctor's profile editor.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tauri::State;

use crate::backend::ProfileUpdateRequest;
use crate::core_state::AppState;
use crate::dashboard::{self, StatsView};
use crate::db::repository::{directory as directory_repo, history, kv};
use crate::db::repository::directory::ProfileOverrides;
use crate::session::{self, Role, UserSession};
use crate::submit_gate::FormKind;

/// Everything the dashboard renders from, in one fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub user: UserSession,
    pub welcome_message: String,
    pub stats: StatsView,
    pub history: Vec<history::ActivityEntry>,
}

/// The doctor's profile-edit form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub name: String,
    pub specialization: String,
    pub hospital_name: String,
    pub address: String,
    pub timings: String,
}

pub(crate) fn get_dashboard_inner(state: &AppState) -> Result<DashboardView, String> {
    let user = state.require_session().map_err(|e| e.to_string())?;
    let conn = state.open_store().map_err(|e| e.to_string())?;

    let stats = state
        .backend()
        .dashboard_stats(user.role.as_str(), &user.email)
        .map_err(|e| e.to_string())?;

    let hidden = directory_repo::hidden_ids(&conn).map_err(|e| e.to_string())?;
    let now = chrono::Local::now().naive_local();
    let stats = dashboard::assemble(stats, &hidden, now);

    let welcome = session::welcome_kind(&conn).map_err(|e| e.to_string())?;
    let history = history::recent_visits(&conn).map_err(|e| e.to_string())?;

    Ok(DashboardView {
        welcome_message: user.welcome_message(welcome),
        user,
        stats,
        history,
    })
}

pub(crate) fn record_tool_visit_inner(
    state: &AppState,
    module: String,
) -> Result<Vec<history::ActivityEntry>, String> {
    state.require_session().map_err(|e| e.to_string())?;
    let conn = state.open_store().map_err(|e| e.to_string())?;

    let now = chrono::Local::now();
    history::record_visit(
        &conn,
        module.trim(),
        &now.format("%d/%m/%Y").to_string(),
        &now.format("%I:%M %p").to_string(),
    )
    .map_err(|e| e.to_string())?;

    history::recent_visits(&conn).map_err(|e| e.to_string())
}

pub(crate) fn update_appointment_status_inner(
    state: &AppState,
    id: i64,
    status: String,
) -> Result<(), String> {
    let user = state.require_session().map_err(|e| e.to_string())?;
    if user.role != Role::Doctor {
        return Err("Only doctors can update appointment outcomes".into());
    }
    state
        .backend()
        .update_appointment_status(id, status.trim())
        .map_err(|e| e.to_string())
}

pub(crate) fn update_doctor_profile_inner(
    state: &AppState,
    form: ProfileForm,
) -> Result<UserSession, String> {
    let user = state.require_session().map_err(|e| e.to_string())?;
    if user.role != Role::Doctor {
        return Err("Only doctors have an editable profile".into());
    }
    let Some(guard) = state.gate().try_begin(FormKind::ProfileUpdate) else {
        return Err("Profile update already in progress".into());
    };
    if form.name.trim().is_empty() {
        guard.fail("Doctor name is required");
        return Err("Doctor name is required".into());
    }

    let conn = state.open_store().map_err(|e| e.to_string())?;
    directory_repo::save_overrides(
        &conn,
        &ProfileOverrides {
            name: Some(form.name.clone()),
            specialization: Some(form.specialization.clone()),
            hospital_name: Some(form.hospital_name.clone()),
            address: Some(form.address.clone()),
            timings: Some(form.timings.clone()),
        },
    )
    .map_err(|e| e.to_string())?;

    // The display name follows the edit everywhere.
    kv::set_value(&conn, kv::KEY_USER_NAME, &form.name).map_err(|e| e.to_string())?;
    let updated = UserSession {
        name: form.name.clone(),
        ..user
    };
    state.set_session(updated.clone()).map_err(|e| e.to_string())?;

    // Best-effort sync to the backend; a failure keeps the local edit.
    if let Err(e) = state.backend().update_doctor_profile(&ProfileUpdateRequest {
        name: form.name,
        specialization: form.specialization,
        hospital_name: form.hospital_name,
        address: form.address,
        timings: form.timings,
    }) {
        tracing::warn!("Doctor profile sync failed: {e}");
    }

    guard.succeed();
    Ok(updated)
}

/// Fetch and normalize the role-based dashboard bundle.
#[tauri::command]
pub fn get_dashboard(state: State<'_, Arc<AppState>>) -> Result<DashboardView, String> {
    get_dashboard_inner(&state)
}

/// Log a navigation into a tool page; returns the updated activity log.
#[tauri::command]
pub fn record_tool_visit(
    module: String,
    state: State<'_, Arc<AppState>>,
) -> Result<Vec<history::ActivityEntry>, String> {
    record_tool_visit_inner(&state, module)
}

/// Mark a queue appointment "Success" or "Missed".
#[tauri::command]
pub fn update_appointment_status(
    id: i64,
    status: String,
    state: State<'_, Arc<AppState>>,
) -> Result<(), String> {
    update_appointment_status_inner(&state, id, status)
}

/// Save the doctor's profile edits locally and push them to the backend.
#[tauri::command]
pub fn update_doctor_profile(
    form: ProfileForm,
    state: State<'_, Arc<AppState>>,
) -> Result<UserSession, String> {
    update_doctor_profile_inner(&state, form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        ActiveAppointment, DashboardStats, Doctor, EfficacyStats, MockBackend,
    };

    fn temp_state(backend: MockBackend) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::with_backend(dir.path().join("client.db"), Box::new(backend));
        (dir, state)
    }

    fn sign_in(state: &AppState, role: Role) {
        let user = UserSession {
            name: "Meera".into(),
            role,
            email: "meera@example.in".into(),
        };
        let conn = state.open_store().unwrap();
        session::persist(&conn, &user).unwrap();
        session::mark_visit(&conn, &user.email).unwrap();
        state.set_session(user).unwrap();
    }

    #[test]
    fn dashboard_requires_session() {
        let (_dir, state) = temp_state(MockBackend::new());
        let err = get_dashboard_inner(&state).unwrap_err();
        assert_eq!(err, "Not signed in");
    }

    #[test]
    fn dashboard_assembles_stats_and_history() {
        let stats = DashboardStats {
            active_doctors_list: Some(vec![
                Doctor {
                    id: 1,
                    name: "Vikram Shah".into(),
                    ..Default::default()
                },
                Doctor {
                    id: 2,
                    name: "Hidden".into(),
                    ..Default::default()
                },
            ]),
            total_app_count: Some(4),
            efficacy_stats: Some(EfficacyStats {
                success: 3,
                missed: 1,
            }),
            ..Default::default()
        };
        let (_dir, state) = temp_state(MockBackend::new().with_stats(stats));
        sign_in(&state, Role::Individual);
        {
            let conn = state.open_store().unwrap();
            directory_repo::hide_doctor(&conn, 2).unwrap();
        }
        record_tool_visit_inner(&state, "Find Doctor".into()).unwrap();

        let view = get_dashboard_inner(&state).unwrap();
        assert_eq!(view.stats.doctor_count, 1);
        assert_eq!(view.stats.total_app_count, 4);
        assert_eq!(view.stats.efficacy.rate_percent, Some(75));
        assert_eq!(view.history.len(), 1);
        assert_eq!(view.history[0].module, "Find Doctor");
        assert_eq!(view.welcome_message, "Welcome, Meera");
    }

    #[test]
    fn stale_appointment_dropped_from_view() {
        let stats = DashboardStats {
            active_appointment: Some(ActiveAppointment {
                doctor: "Meera Rao".into(),
                disease: None,
                date: Some("2000-01-01".into()),
                time: Some("09:00 AM".into()),
            }),
            ..Default::default()
        };
        let (_dir, state) = temp_state(MockBackend::new().with_stats(stats));
        sign_in(&state, Role::Individual);

        let view = get_dashboard_inner(&state).unwrap();
        assert!(view.stats.active_appointment.is_none());
    }

    #[test]
    fn eleven_visits_keep_ten() {
        let (_dir, state) = temp_state(MockBackend::new());
        sign_in(&state, Role::Individual);
        for i in 0..11 {
            record_tool_visit_inner(&state, format!("Module {i}")).unwrap();
        }
        let log = record_tool_visit_inner(&state, "Module last".into()).unwrap();
        assert_eq!(log.len(), 10);
        assert_eq!(log[0].module, "Module last");
    }

    #[test]
    fn status_update_is_doctor_only() {
        let (_dir, state) = temp_state(MockBackend::new());
        sign_in(&state, Role::Individual);
        let err = update_appointment_status_inner(&state, 7, "Success".into()).unwrap_err();
        assert!(err.contains("Only doctors"));
    }

    #[test]
    fn status_update_forwards_to_backend() {
        let mock = std::sync::Arc::new(MockBackend::new());
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::with_backend(
            dir.path().join("client.db"),
            Box::new(std::sync::Arc::clone(&mock)),
        );
        sign_in(&state, Role::Doctor);

        update_appointment_status_inner(&state, 7, "Success".into()).unwrap();

        let updates = mock.status_updates.lock().unwrap();
        assert_eq!(updates.as_slice(), &[(7, "Success".to_string())]);
    }

    #[test]
    fn profile_update_saves_overrides_and_renames_session() {
        let (_dir, state) = temp_state(MockBackend::new());
        sign_in(&state, Role::Doctor);

        let updated = update_doctor_profile_inner(
            &state,
            ProfileForm {
                name: "Meera Rao".into(),
                specialization: "Cardiologist".into(),
                hospital_name: "Heart Centre".into(),
                address: "MG Road".into(),
                timings: "10:00 AM - 06:00 PM".into(),
            },
        )
        .unwrap();

        assert_eq!(updated.name, "Meera Rao");
        assert_eq!(state.require_session().unwrap().name, "Meera Rao");

        let conn = state.open_store().unwrap();
        let overrides = directory_repo::load_overrides(&conn).unwrap();
        assert_eq!(overrides.hospital_name.as_deref(), Some("Heart Centre"));
        assert_eq!(
            kv::get_value(&conn, kv::KEY_USER_NAME).unwrap().as_deref(),
            Some("Meera Rao")
        );
    }

    #[test]
    fn profile_update_survives_backend_failure() {
        let (_dir, state) = temp_state(MockBackend::new().rejecting("sync down"));
        sign_in(&state, Role::Doctor);

        // Backend rejection is swallowed; the local edit still lands.
        let result = update_doctor_profile_inner(
            &state,
            ProfileForm {
                name: "Meera Rao".into(),
                specialization: "Cardiologist".into(),
                hospital_name: "Heart Centre".into(),
                address: "MG Road".into(),
                timings: "10:00 AM - 06:00 PM".into(),
            },
        );
        assert!(result.is_ok());
    }

    #[test]
    fn profile_update_is_doctor_only() {
        let (_dir, state) = temp_state(MockBackend::new());
        sign_in(&state, Role::Admin);
        let err = update_doctor_profile_inner(
            &state,
            ProfileForm {
                name: "X".into(),
                specialization: "".into(),
                hospital_name: "".into(),
                address: "".into(),
                timings: "".into(),
            },
        )
        .unwrap_err();
        assert!(err.contains("Only doctors"));
    }
}
