use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Demographics slice of a patient, as served by the patient directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i32,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
}

/// Unrecognized wire values fall into `Other`, which classifies as
/// `RiskLevel::None` rather than failing deserialization. Parsing is
/// case-insensitive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("male") {
            Gender::Male
        } else if value.eq_ignore_ascii_case("female") {
            Gender::Female
        } else {
            Gender::Other
        }
    }
}

/// A clinical note as served by the note store. Read-only input here; the
/// search index is a disposable projection of these, never a second source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(rename = "patientId")]
    pub patient_id: i32,
    #[serde(rename = "note")]
    pub text: String,
    pub date: DateTime<Utc>,
}

/// One matching note from a trigger search: the note id plus the
/// highlighted fragments with `«`/`»` markers around each matched term.
/// Transient, discarded after aggregation.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub note_id: String,
    pub fragments: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    None,
    Borderline,
    InDanger,
    EarlyOnset,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "None",
            RiskLevel::Borderline => "Borderline",
            RiskLevel::InDanger => "In Danger",
            RiskLevel::EarlyOnset => "Early Onset",
        }
    }
}

/// Final output of the pipeline. Built fresh on every request; for a fixed
/// note set and catalog the contents are deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub patient_id: i32,
    pub risk_level: RiskLevel,
    pub trigger_terms: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_gender_deserializes_as_other() {
        let patient: Patient = serde_json::from_str(
            r#"{"id": 7, "dateOfBirth": "1990-06-15", "gender": "Nonbinary"}"#,
        )
        .unwrap();
        assert_eq!(patient.gender, Gender::Other);
    }

    #[test]
    fn gender_parsing_ignores_case() {
        assert_eq!(Gender::from("FEMALE".to_string()), Gender::Female);
        assert_eq!(Gender::from("male".to_string()), Gender::Male);
    }

    #[test]
    fn note_uses_source_wire_names() {
        let note: Note = serde_json::from_str(
            r#"{"id": "n-1", "patientId": 3, "note": "Poids stable", "date": "2025-01-24T09:46:17Z"}"#,
        )
        .unwrap();
        assert_eq!(note.patient_id, 3);
        assert_eq!(note.text, "Poids stable");
    }
}
