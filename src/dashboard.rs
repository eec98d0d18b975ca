//! Dashboard stats normalization.
//!
//! The backend sends one wholesale stats payload per role with most
//! sections optional. Assembly is pure with respect to (payload, hidden-id
//! set, now): locally hidden doctors are filtered before counting, the
//! active appointment is expired client-side once its timestamp passes,
//! and every optional field gets a rendering-safe default.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::backend::{
    ActiveAppointment, DashboardStats, Doctor, PastAppointment, PatientRecord, QueueAppointment,
};

// ═══════════════════════════════════════════════════════════
// Appointment expiry
// ═══════════════════════════════════════════════════════════

/// Parse a 12-hour clock label ("03:00 PM", or "<date-phrase> at 03:00 PM")
/// into 24-hour (hour, minute). PM adds 12 except at 12 PM; 12 AM is 0.
fn parse_clock(time: &str) -> Option<(u32, u32)> {
    // Receipts store "date at time"; keep only the clock part.
    let clock = match time.rsplit_once(" at ") {
        Some((_, tail)) => tail,
        None => time,
    };
    let (hm, period) = clock.trim().split_once(' ')?;
    let (h, m) = hm.split_once(':')?;
    let mut hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    if hours > 12 || minutes > 59 {
        return None;
    }
    match period {
        "PM" if hours != 12 => hours += 12,
        "AM" if hours == 12 => hours = 0,
        "AM" | "PM" => {}
        _ => return None,
    }
    Some((hours, minutes))
}

/// Suppress an appointment whose date+time is strictly before `now`.
///
/// A record with a missing or unparseable date or time passes through
/// unmodified — it is treated as still active rather than discarded.
pub fn expire_if_past(
    appt: Option<ActiveAppointment>,
    now: NaiveDateTime,
) -> Option<ActiveAppointment> {
    let appt = appt?;
    let when = match (appt.date.as_deref(), appt.time.as_deref()) {
        (Some(date), Some(time)) => parse_clock(time).and_then(|(hours, minutes)| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .and_then(|day| day.and_hms_opt(hours, minutes, 0))
        }),
        _ => None,
    };
    match when {
        Some(when) if when < now => None,
        _ => Some(appt),
    }
}

// ═══════════════════════════════════════════════════════════
// Assembled view
// ═══════════════════════════════════════════════════════════

/// System health with every field defaulted for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealthView {
    pub status: String,
    pub uptime: String,
    pub database: String,
}

impl Default for SystemHealthView {
    fn default() -> Self {
        Self {
            status: "Operational".to_string(),
            uptime: "100%".to_string(),
            database: "Connected".to_string(),
        }
    }
}

/// Doctor outcome counters plus the derived efficiency rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficacyView {
    pub success: u32,
    pub missed: u32,
    /// Percent of successful outcomes; `None` until there is at least one
    /// recorded outcome (rendered as "N/A").
    pub rate_percent: Option<u32>,
}

impl EfficacyView {
    fn from_counts(success: u32, missed: u32) -> Self {
        let total = success + missed;
        let rate_percent = if total == 0 {
            None
        } else {
            Some((f64::from(success) / f64::from(total) * 100.0).round() as u32)
        };
        Self {
            success,
            missed,
            rate_percent,
        }
    }
}

/// The normalized stats bundle the dashboard renders from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    pub doctor_count: usize,
    pub doctors: Vec<Doctor>,
    pub active_appointment: Option<ActiveAppointment>,
    pub past_appointments: Vec<PastAppointment>,
    pub total_app_count: u32,
    pub all_appointments: Vec<QueueAppointment>,
    pub patient_records: Vec<PatientRecord>,
    #[serde(default)]
    pub system_health: SystemHealthView,
    pub doctor_queue: Vec<QueueAppointment>,
    pub efficacy: EfficacyView,
}

/// Normalize a raw stats payload for display.
pub fn assemble(stats: DashboardStats, hidden: &HashSet<i64>, now: NaiveDateTime) -> StatsView {
    let doctors: Vec<Doctor> = stats
        .active_doctors_list
        .unwrap_or_default()
        .into_iter()
        .filter(|d| !hidden.contains(&d.id))
        .collect();

    let efficacy = stats
        .efficacy_stats
        .map(|e| EfficacyView::from_counts(e.success, e.missed))
        .unwrap_or_default();

    let system_health = stats
        .system_health
        .map(|h| {
            let defaults = SystemHealthView::default();
            SystemHealthView {
                status: h.status.unwrap_or(defaults.status),
                uptime: h.uptime.unwrap_or(defaults.uptime),
                database: h.database.unwrap_or(defaults.database),
            }
        })
        .unwrap_or_default();

    StatsView {
        doctor_count: doctors.len(),
        doctors,
        active_appointment: expire_if_past(stats.active_appointment, now),
        past_appointments: stats.past_appointments.unwrap_or_default(),
        total_app_count: stats.total_app_count.unwrap_or(0),
        all_appointments: stats.all_appointments.unwrap_or_default(),
        patient_records: stats.patient_records.unwrap_or_default(),
        system_health,
        doctor_queue: stats.doctor_active_appts.unwrap_or_default(),
        efficacy,
    }
}
