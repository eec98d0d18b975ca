//! Disease → specialist routing for the "Find ... Near Me" actions.

/// Known disease/specialist pairs. Lookup is exact first, then by
/// substring, so "Diabetes Type 2" still routes through "Diabetes".
const SPECIALIST_TABLE: &[(&str, &str)] = &[
    ("Asthma", "Pulmonologist"),
    ("Bronchial Asthma", "Pulmonologist"),
    ("Diabetes", "Endocrinologist"),
    ("Diabetes Type 2", "Endocrinologist"),
    ("Hypertension", "Cardiologist"),
    ("Heart attack", "Cardiologist"),
    ("Migraine", "Neurologist"),
    ("Paralysis", "Neurologist"),
    ("Jaundice", "Gastroenterologist"),
    ("Malaria", "General Physician"),
    ("Dengue", "General Physician"),
    ("Typhoid", "General Physician"),
    ("Pneumonia", "Pulmonologist"),
    ("Arthritis", "Rheumatologist"),
    ("Acne", "Dermatologist"),
    ("Psoriasis", "Dermatologist"),
    ("Fungal infection", "Dermatologist"),
    ("GERD", "Gastroenterologist"),
    ("Common Cold", "General Physician"),
    ("Tuberculosis", "Pulmonologist"),
    ("(vertigo) Paroymsal Positional Vertigo", "Neurologist"),
    ("Urinary tract infection", "Urologist"),
    ("Hypothyroidism", "Endocrinologist"),
];

/// Fallback when no table entry matches.
pub const DEFAULT_SPECIALIST: &str = "General Physician";

/// Map a disease name to the specialist who treats it.
pub fn specialist_for(disease: &str) -> &'static str {
    if let Some((_, specialist)) = SPECIALIST_TABLE.iter().find(|(name, _)| *name == disease) {
        return specialist;
    }
    if let Some((_, specialist)) = SPECIALIST_TABLE
        .iter()
        .find(|(name, _)| disease.contains(name))
    {
        return specialist;
    }
    DEFAULT_SPECIALIST
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert_eq!(specialist_for("Migraine"), "Neurologist");
        assert_eq!(specialist_for("Hypothyroidism"), "Endocrinologist");
    }

    #[test]
    fn substring_match() {
        assert_eq!(specialist_for("Chronic Migraine (severe)"), "Neurologist");
        assert_eq!(specialist_for("Diabetes Mellitus"), "Endocrinologist");
    }

    #[test]
    fn unknown_falls_back_to_general_physician() {
        assert_eq!(specialist_for("Sprained Ankle"), DEFAULT_SPECIALIST);
        assert_eq!(specialist_for(""), DEFAULT_SPECIALIST);
    }
}
