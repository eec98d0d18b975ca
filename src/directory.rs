//! Find-doctor listing assembly.
//!
//! The fetched registry is adjusted locally before display: hidden ids are
//! dropped, a signed-in doctor always sees their own profile pinned first
//! (with local edits winning over the server copy, synthesized outright if
//! the server has no copy yet), and missing rating/review figures are
//! filled with generated display values.

use std::collections::HashSet;

use rand::Rng;

use crate::backend::Doctor;
use crate::db::repository::directory::ProfileOverrides;
use crate::schedule;
use crate::session::{Role, UserSession};

/// Id used for a self profile that does not exist on the server yet.
/// Never persisted; it only keys the synthesized card in the view.
pub const PLACEHOLDER_ID: i64 = 99_999;

/// Hospital-name filler shown until the doctor edits their profile.
const PLACEHOLDER_HOSPITAL: &str = "Your Clinic (Update Profile)";

/// Default placeholder address.
const PLACEHOLDER_ADDRESS: &str = "Bhopal";

/// Apply local profile edits on top of a doctor record.
fn merge_overrides(mut doctor: Doctor, overrides: &ProfileOverrides) -> Doctor {
    if let Some(name) = &overrides.name {
        doctor.name = name.clone();
    }
    if let Some(spec) = &overrides.specialization {
        doctor.specialization = spec.clone();
    }
    if let Some(hospital) = &overrides.hospital_name {
        doctor.hospital_name = hospital.clone();
    }
    if let Some(address) = &overrides.address {
        doctor.address = address.clone();
    }
    if let Some(timings) = &overrides.timings {
        doctor.timings = timings.clone();
    }
    doctor
}

/// Synthesize the self card for a doctor the server does not know yet.
fn placeholder_self(viewer: &UserSession, overrides: &ProfileOverrides) -> Doctor {
    Doctor {
        id: PLACEHOLDER_ID,
        name: overrides.name.clone().unwrap_or_else(|| viewer.name.clone()),
        specialization: overrides
            .specialization
            .clone()
            .unwrap_or_else(|| "General Physician".to_string()),
        hospital_name: overrides
            .hospital_name
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_HOSPITAL.to_string()),
        address: overrides
            .address
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_ADDRESS.to_string()),
        timings: overrides
            .timings
            .clone()
            .unwrap_or_else(|| schedule::DEFAULT_TIMINGS.to_string()),
        rating: Some("5.0".to_string()),
        reviews: Some(0),
        email: Some(viewer.email.clone()),
    }
}

/// Does this fetched record belong to the viewer?
fn is_self(doctor: &Doctor, viewer: &UserSession) -> bool {
    doctor.email.as_deref() == Some(viewer.email.as_str()) || doctor.name == viewer.name
}

/// Assemble the displayed list from the fetched registry.
pub fn assemble(
    fetched: Vec<Doctor>,
    hidden: &HashSet<i64>,
    viewer: Option<&UserSession>,
    overrides: &ProfileOverrides,
) -> Vec<Doctor> {
    let mut doctors: Vec<Doctor> = fetched
        .into_iter()
        .filter(|d| !hidden.contains(&d.id))
        .collect();

    if let Some(viewer) = viewer.filter(|v| v.role == Role::Doctor) {
        let own = match doctors.iter().position(|d| is_self(d, viewer)) {
            Some(index) => merge_overrides(doctors.remove(index), overrides),
            None => placeholder_self(viewer, overrides),
        };
        doctors.insert(0, own);
    }

    fill_display_ratings(&mut doctors);
    doctors
}

/// Fill missing rating/review figures with plausible display values.
/// Records that carry real figures keep them.
fn fill_display_ratings(doctors: &mut [Doctor]) {
    let mut rng = rand::thread_rng();
    for doctor in doctors {
        if doctor.rating.is_none() {
            doctor.rating = Some(format!("{:.1}", rng.gen_range(4.0..5.0)));
        }
        if doctor.reviews.is_none() {
            doctor.reviews = Some(rng.gen_range(20..120));
        }
    }
}

/// Case-insensitive name/specialization filter.
pub fn filter_query(doctors: Vec<Doctor>, query: &str) -> Vec<Doctor> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return doctors;
    }
    doctors
        .into_iter()
        .filter(|d| {
            d.name.to_lowercase().contains(&needle)
                || d.specialization.to_lowercase().contains(&needle)
        })
        .collect()
}

/// A doctor may never be hidden by the account it belongs to.
pub fn can_hide(doctor: &Doctor, viewer_email: &str) -> bool {
    doctor.email.as_deref() != Some(viewer_email)
}
