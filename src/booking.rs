//! Appointment booking: form draft, derived fields, validation, receipt.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::BookingRequest;

/// Country calling code shown as a fixed prefix on the phone field.
pub const PHONE_PREFIX: &str = "+91";

/// Digits expected after the prefix.
pub const PHONE_DIGITS: usize = 10;

// ═══════════════════════════════════════════════════════════
// Derived fields
// ═══════════════════════════════════════════════════════════

/// Whole years between `dob` and `today`: full-year difference, minus one
/// when today's month/day precedes the birth month/day.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Age for a raw DOB field value. Empty or unparseable input clears the
/// derived age. A future date is not rejected here.
pub fn derive_age(dob_input: &str, today: NaiveDate) -> Option<i32> {
    if dob_input.trim().is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(dob_input.trim(), "%Y-%m-%d")
        .ok()
        .map(|dob| age_on(dob, today))
}

/// Apply one edit to the phone field: digits only, capped at 10. A
/// non-digit edit is rejected — the stored value comes back unchanged.
pub fn apply_phone_edit(current: &str, proposed: &str) -> String {
    if !proposed.chars().all(|c| c.is_ascii_digit()) {
        return current.to_string();
    }
    proposed.chars().take(PHONE_DIGITS).collect()
}

/// Full display/wire form of a 10-digit number: "+91 XXXXXXXXXX".
pub fn format_phone(digits: &str) -> String {
    format!("{PHONE_PREFIX} {digits}")
}

// ═══════════════════════════════════════════════════════════
// Draft and receipt
// ═══════════════════════════════════════════════════════════

/// Transient booking form state. `Default` is the pristine form that
/// "Book Another" resets to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub patient_name: String,
    pub dob: String,
    /// Derived from `dob`, never edited directly.
    pub age: Option<i32>,
    pub doctor_name: String,
    pub hospital_name: String,
    pub date: String,
    pub time: String,
    pub disease: String,
    /// Bare digits; the "+91" prefix is added at submission.
    pub phone: String,
}

/// Validation failures caught before anything goes on the wire.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Please enter a valid 10-digit phone number")]
    PhoneLength,
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl BookingDraft {
    /// Check the draft is submittable.
    pub fn validate(&self) -> Result<(), BookingError> {
        for (value, label) in [
            (&self.patient_name, "Patient name"),
            (&self.dob, "Date of birth"),
            (&self.doctor_name, "Doctor"),
            (&self.date, "Appointment date"),
            (&self.time, "Time slot"),
            (&self.disease, "Disease / symptoms"),
        ] {
            if value.trim().is_empty() {
                return Err(BookingError::MissingField(label));
            }
        }
        if self.phone.len() != PHONE_DIGITS
            || !self.phone.chars().all(|c| c.is_ascii_digit())
        {
            return Err(BookingError::PhoneLength);
        }
        Ok(())
    }

    /// Wire payload for a validated draft.
    pub fn to_request(&self, user_email: &str) -> BookingRequest {
        BookingRequest {
            patient_name: self.patient_name.clone(),
            user_email: user_email.to_string(),
            dob: self.dob.clone(),
            age: self.age.map(|a| a.to_string()).unwrap_or_default(),
            doctor_name: self.doctor_name.clone(),
            hospital_name: self.hospital_name.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            disease: self.disease.clone(),
            phone: format_phone(&self.phone),
        }
    }
}

/// Confirmation view shown after a successful booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub reference: String,
    pub patient_name: String,
    pub dob: String,
    pub age: String,
    pub doctor_name: String,
    pub hospital_name: String,
    pub date: String,
    pub time: String,
    pub disease: String,
    pub phone: String,
}

impl BookingReceipt {
    /// Build the receipt for an accepted booking. The reference is local
    /// display state only — the backend does not return one.
    pub fn for_accepted(req: &BookingRequest) -> Self {
        Self {
            reference: Uuid::new_v4().to_string(),
            patient_name: req.patient_name.clone(),
            dob: req.dob.clone(),
            age: req.age.clone(),
            doctor_name: req.doctor_name.clone(),
            hospital_name: req.hospital_name.clone(),
            date: req.date.clone(),
            time: req.time.clone(),
            disease: req.disease.clone(),
            phone: req.phone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn valid_draft() -> BookingDraft {
        BookingDraft {
            patient_name: "Asha".into(),
            dob: "1996-03-14".into(),
            age: Some(30),
            doctor_name: "Meera Rao".into(),
            hospital_name: "City Care".into(),
            date: "2026-08-20".into(),
            time: "03:00 PM".into(),
            disease: "Migraine".into(),
            phone: "9876543210".into(),
        }
    }

    #[test]
    fn age_exactly_thirty_years() {
        assert_eq!(age_on(date(1996, 8, 7), date(2026, 8, 7)), 30);
    }

    #[test]
    fn birthday_tomorrow_still_twenty_nine() {
        assert_eq!(age_on(date(1996, 8, 8), date(2026, 8, 7)), 29);
    }

    #[test]
    fn birthday_earlier_this_year() {
        assert_eq!(age_on(date(1996, 3, 14), date(2026, 8, 7)), 30);
    }

    #[test]
    fn empty_dob_clears_age() {
        assert_eq!(derive_age("", date(2026, 8, 7)), None);
        assert_eq!(derive_age("  ", date(2026, 8, 7)), None);
    }

    #[test]
    fn future_dob_not_rejected() {
        // Negative age is the documented behavior: no future-date check.
        assert_eq!(derive_age("2030-01-01", date(2026, 8, 7)), Some(-4));
    }

    #[test]
    fn phone_edit_truncates_to_ten_digits() {
        assert_eq!(apply_phone_edit("987654321", "98765432109"), "9876543210");
    }

    #[test]
    fn phone_edit_rejects_non_digits() {
        assert_eq!(apply_phone_edit("98765", "98765a"), "98765");
        assert_eq!(apply_phone_edit("", "+91"), "");
    }

    #[test]
    fn phone_edit_accepts_digits() {
        assert_eq!(apply_phone_edit("", "9"), "9");
        assert_eq!(apply_phone_edit("9", "98"), "98");
    }

    #[test]
    fn valid_draft_passes() {
        assert!(valid_draft().validate().is_ok());
    }

    #[test]
    fn short_phone_fails_validation() {
        let mut draft = valid_draft();
        draft.phone = "98765".into();
        assert_eq!(draft.validate().unwrap_err(), BookingError::PhoneLength);
    }

    #[test]
    fn missing_doctor_fails_validation() {
        let mut draft = valid_draft();
        draft.doctor_name = "".into();
        assert_eq!(
            draft.validate().unwrap_err(),
            BookingError::MissingField("Doctor")
        );
    }

    #[test]
    fn request_carries_prefixed_phone() {
        let req = valid_draft().to_request("asha@example.in");
        assert_eq!(req.phone, "+91 9876543210");
        assert_eq!(req.user_email, "asha@example.in");
        assert_eq!(req.age, "30");
    }

    #[test]
    fn receipt_echoes_request() {
        let req = valid_draft().to_request("asha@example.in");
        let receipt = BookingReceipt::for_accepted(&req);
        assert_eq!(receipt.patient_name, "Asha");
        assert_eq!(receipt.phone, "+91 9876543210");
        assert!(!receipt.reference.is_empty());
    }

    #[test]
    fn default_draft_is_pristine() {
        let draft = BookingDraft::default();
        assert!(draft.patient_name.is_empty());
        assert!(draft.phone.is_empty());
        assert!(draft.age.is_none());
    }
}
