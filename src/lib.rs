pub mod backend;
pub mod booking;
pub mod commands;
pub mod config;
pub mod core_state;
pub mod dashboard;
pub mod db;
pub mod directory;
pub mod sanitize;
pub mod schedule;
pub mod session;
pub mod specialist;
pub mod submit_gate;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("AyurSync starting v{}", config::APP_VERSION);

    let state = Arc::new(core_state::AppState::new());

    // Resume a persisted session so a restarted app lands on the dashboard.
    if let Err(e) = state.hydrate_session() {
        tracing::warn!("Could not restore session: {e}");
    }

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(state)
        .invoke_handler(tauri::generate_handler![
            commands::health_check,
            commands::form_phase,
            commands::auth::register,
            commands::auth::login,
            commands::auth::logout,
            commands::auth::session_status,
            commands::dashboard::get_dashboard,
            commands::dashboard::record_tool_visit,
            commands::dashboard::update_appointment_status,
            commands::dashboard::update_doctor_profile,
            commands::doctors::find_doctors,
            commands::doctors::hide_doctor,
            commands::booking::new_booking_draft,
            commands::booking::booking_slots,
            commands::booking::derive_booking_age,
            commands::booking::apply_phone_input,
            commands::booking::submit_booking,
            commands::tools::search_disease,
            commands::tools::analyze_symptoms,
        ])
        .run(tauri::generate_context!())
        .expect("error while running AyurSync");
}
