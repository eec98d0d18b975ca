//! Appointment-booking IPC commands.

use std::sync::Arc;

use tauri::State;

use crate::booking::{self, BookingDraft, BookingReceipt};
use crate::core_state::AppState;
use crate::schedule;
use crate::submit_gate::FormKind;

pub(crate) fn new_booking_draft_inner(state: &AppState) -> Result<BookingDraft, String> {
    let user = state.require_session().map_err(|e| e.to_string())?;
    Ok(BookingDraft {
        patient_name: user.name,
        ..Default::default()
    })
}

pub(crate) fn submit_booking_inner(
    state: &AppState,
    draft: BookingDraft,
) -> Result<BookingReceipt, String> {
    let user = state.require_session().map_err(|e| e.to_string())?;

    if let Err(e) = draft.validate() {
        return Err(e.to_string());
    }

    let Some(guard) = state.gate().try_begin(FormKind::Booking) else {
        return Err("Booking already in progress".into());
    };

    let request = draft.to_request(&user.email);
    match state.backend().book_appointment(&request) {
        Ok(()) => {
            guard.succeed();
            Ok(BookingReceipt::for_accepted(&request))
        }
        Err(e) => {
            let msg = e.to_string();
            guard.fail(&msg);
            Err(msg)
        }
    }
}

/// A pristine draft with the patient name prefilled from the session.
#[tauri::command]
pub fn new_booking_draft(state: State<'_, Arc<AppState>>) -> Result<BookingDraft, String> {
    new_booking_draft_inner(&state)
}

/// The candidate time-slot labels for the booking form.
#[tauri::command]
pub fn booking_slots() -> Vec<String> {
    schedule::half_hour_slots()
}

/// Age derived from the DOB field, or `None` when the field is cleared.
#[tauri::command]
pub fn derive_booking_age(dob: String) -> Option<i32> {
    booking::derive_age(&dob, chrono::Local::now().date_naive())
}

/// One keystroke's worth of phone-field normalization.
#[tauri::command]
pub fn apply_phone_input(current: String, proposed: String) -> String {
    booking::apply_phone_edit(&current, &proposed)
}

/// Validate and submit a booking; returns the receipt on success.
#[tauri::command]
pub fn submit_booking(
    draft: BookingDraft,
    state: State<'_, Arc<AppState>>,
) -> Result<BookingReceipt, String> {
    submit_booking_inner(&state, draft)
}
