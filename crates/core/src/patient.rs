//! Patient reference data.
//!
//! Patients are admitted by an external process and supplied to the store
//! read-only at initialisation (see [`crate::roster`]). No mutation
//! operations are defined: the record is immutable for the lifetime of the
//! session and is never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Administrative gender marker carried on the admission record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    /// Returns the wire form of the marker (`"M"` or `"F"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }
}

/// Identity and clinical context for one admitted individual.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    /// Medical record number assigned by the admitting facility.
    pub mrn: String,
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub blood_type: String,
    pub admitted_at: DateTime<Utc>,
    pub room: String,
    pub attending_doctor: String,
    pub allergies: Vec<String>,
    pub current_meds: Vec<String>,
    pub problems: Vec<String>,
    /// Primary working diagnosis.
    pub diagnosis: String,
}
