//! Patient roster loading.
//!
//! The roster is the store's reference data: patients admitted by an
//! external process, supplied as a JSON file and held read-only for the
//! session. Parsing goes through a strict wire model so that a malformed
//! roster fails loudly at startup with the path to the offending field,
//! instead of surfacing as a half-loaded ward later.

use crate::error::{StoreError, StoreResult};
use crate::patient::{Gender, Patient};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Wire representation of one roster entry.
///
/// Unknown keys are rejected outright; the medication/allergy/problem
/// lists may be omitted for a fresh admission.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatientWire {
    id: Uuid,
    mrn: String,
    name: String,
    age: u8,
    gender: Gender,
    blood_type: String,
    admitted_at: DateTime<Utc>,
    room: String,
    attending_doctor: String,
    #[serde(default)]
    allergies: Vec<String>,
    #[serde(default)]
    current_meds: Vec<String>,
    #[serde(default)]
    problems: Vec<String>,
    diagnosis: String,
}

impl From<PatientWire> for Patient {
    fn from(wire: PatientWire) -> Self {
        Patient {
            id: wire.id,
            mrn: wire.mrn,
            name: wire.name,
            age: wire.age,
            gender: wire.gender,
            blood_type: wire.blood_type,
            admitted_at: wire.admitted_at,
            room: wire.room,
            attending_doctor: wire.attending_doctor,
            allergies: wire.allergies,
            current_meds: wire.current_meds,
            problems: wire.problems,
            diagnosis: wire.diagnosis,
        }
    }
}

/// Parses a roster from JSON text.
///
/// This uses `serde_path_to_error` to surface a best-effort "path" (e.g.
/// `[2].admitted_at`) to the failing field when the JSON does not match the
/// wire schema.
///
/// # Errors
///
/// Returns [`StoreError::RosterParse`] if the JSON is not an array of valid
/// roster entries, naming the failing field where possible.
pub fn parse_roster(json: &str) -> StoreResult<Vec<Patient>> {
    let deserializer = &mut serde_json::Deserializer::from_str(json);

    let wire: Vec<PatientWire> = match serde_path_to_error::deserialize(deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let path = err.path().to_string();
            let path = if path.is_empty() {
                "<root>".to_string()
            } else {
                path
            };
            return Err(StoreError::RosterParse {
                path,
                source: err.into_inner(),
            });
        }
    };

    Ok(wire.into_iter().map(Patient::from).collect())
}

/// Loads a roster file from disk.
///
/// # Errors
///
/// Returns [`StoreError::RosterRead`] if the file cannot be read, or any
/// error from [`parse_roster`].
pub fn load_roster(path: &Path) -> StoreResult<Vec<Patient>> {
    let contents = fs::read_to_string(path).map_err(StoreError::RosterRead)?;
    let roster = parse_roster(&contents)?;
    tracing::info!(count = roster.len(), path = %path.display(), "loaded patient roster");
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const SAMPLE: &str = r#"[
        {
            "id": "7f4c2e9d-4b0a-4f3a-9a2c-0e9a6b5d1c88",
            "mrn": "MRN-004417",
            "name": "Margaret Hale",
            "age": 64,
            "gender": "F",
            "blood_type": "O+",
            "admitted_at": "2026-08-05T07:42:00Z",
            "room": "312-B",
            "attending_doctor": "Dr. Okafor",
            "allergies": ["penicillin"],
            "current_meds": ["metformin"],
            "problems": ["type 2 diabetes"],
            "diagnosis": "Community-acquired pneumonia"
        }
    ]"#;

    #[test]
    fn parses_sample_roster() {
        let roster = parse_roster(SAMPLE).expect("parse roster");
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Margaret Hale");
        assert_eq!(roster[0].allergies, ["penicillin"]);
    }

    #[test]
    fn omitted_lists_default_to_empty() {
        let json = r#"[
            {
                "id": "7f4c2e9d-4b0a-4f3a-9a2c-0e9a6b5d1c88",
                "mrn": "MRN-004417",
                "name": "Margaret Hale",
                "age": 64,
                "gender": "F",
                "blood_type": "O+",
                "admitted_at": "2026-08-05T07:42:00Z",
                "room": "312-B",
                "attending_doctor": "Dr. Okafor",
                "diagnosis": "Community-acquired pneumonia"
            }
        ]"#;

        let roster = parse_roster(json).expect("parse roster");
        assert!(roster[0].allergies.is_empty());
        assert!(roster[0].current_meds.is_empty());
        assert!(roster[0].problems.is_empty());
    }

    #[test]
    fn rejects_unknown_keys_with_field_path() {
        let json = SAMPLE.replace("\"room\"", "\"ward_room\"");
        let err = parse_roster(&json).expect_err("should reject unknown key");
        match err {
            StoreError::RosterParse { path, .. } => {
                assert!(path.starts_with("[0]"), "unexpected path: {path}");
            }
            other => panic!("expected RosterParse error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_patient_id() {
        let json = SAMPLE.replace("7f4c2e9d-4b0a-4f3a-9a2c-0e9a6b5d1c88", "not-a-uuid");
        let err = parse_roster(&json).expect_err("should reject invalid uuid");
        assert!(matches!(err, StoreError::RosterParse { .. }));
    }

    #[test]
    fn loads_roster_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let roster = load_roster(file.path()).expect("load roster");
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn missing_file_surfaces_read_error() {
        let err = load_roster(Path::new("/nonexistent/roster.json")).unwrap_err();
        assert!(matches!(err, StoreError::RosterRead(_)));
    }
}
