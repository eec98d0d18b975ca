pub mod auth;
pub mod booking;
pub mod dashboard;
pub mod doctors;
pub mod tools;

use std::sync::Arc;

use tauri::State;

use crate::core_state::AppState;
use crate::submit_gate::{FormKind, FormPhase};

/// Health check IPC command — verifies the Rust core is running.
#[tauri::command]
pub fn health_check() -> String {
    tracing::debug!("Health check called");
    "ok".to_string()
}

/// Observable phase of a form, for the frontend's submit buttons and
/// error banners.
#[tauri::command]
pub fn form_phase(kind: FormKind, state: State<'_, Arc<AppState>>) -> FormPhase {
    state.gate().phase(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_returns_ok() {
        assert_eq!(health_check(), "ok");
    }
}
