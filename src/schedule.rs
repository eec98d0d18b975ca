//! Half-hour clock labels.
//!
//! One fixed sequence serves both the doctor-availability selectors
//! (registration and profile edit) and the booking time-slot list. The
//! booking list is intentionally the full day — slots are not filtered by
//! the selected doctor's configured opening hours.

/// Number of half-hour slots in a day.
pub const SLOTS_PER_DAY: usize = 48;

/// Default availability range for a doctor who has not picked one.
pub const DEFAULT_TIMINGS: &str = "09:00 AM - 05:00 PM";

/// The ordered full-day sequence of "hh:mm AM/PM" labels, from
/// "12:00 AM" through "11:30 PM".
pub fn half_hour_slots() -> Vec<String> {
    (0..SLOTS_PER_DAY)
        .map(|i| {
            let total_minutes = i * 30;
            let hours = total_minutes / 60;
            let minutes = total_minutes % 60;
            let ampm = if hours >= 12 { "PM" } else { "AM" };
            // 12-hour wraparound: hour 0 and hour 12 both display as 12
            let display_hours = if hours % 12 == 0 { 12 } else { hours % 12 };
            format!("{display_hours:02}:{minutes:02} {ampm}")
        })
        .collect()
}

/// Join a start and end label into the stored "start - end" range.
pub fn timing_range(start: &str, end: &str) -> String {
    format!("{start} - {end}")
}

/// Split a stored range into (start, end). Missing or malformed ranges
/// fall back to the default working day.
pub fn split_timing_range(range: &str) -> (String, String) {
    let mut parts = range.splitn(2, " - ");
    match (parts.next(), parts.next()) {
        (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
            (start.to_string(), end.to_string())
        }
        _ => ("09:00 AM".to_string(), "05:00 PM".to_string()),
    }
}
