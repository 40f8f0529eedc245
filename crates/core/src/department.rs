//! Hospital departments that receive clinical action routing.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// A department work queue target.
///
/// Every clinical action is routed to exactly one department, fixed at
/// creation time. The department determines which pending queue the action
/// appears in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Pharmacy,
    Lab,
    Imaging,
    Nursing,
    Doctor,
}

impl Department {
    /// Returns the wire form of the department (`"pharmacy"`, `"lab"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Pharmacy => "pharmacy",
            Department::Lab => "lab",
            Department::Imaging => "imaging",
            Department::Nursing => "nursing",
            Department::Doctor => "doctor",
        }
    }

    /// Parses the wire form of a department.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] for an unrecognised value.
    pub fn parse(value: &str) -> StoreResult<Self> {
        match value {
            "pharmacy" => Ok(Department::Pharmacy),
            "lab" => Ok(Department::Lab),
            "imaging" => Ok(Department::Imaging),
            "nursing" => Ok(Department::Nursing),
            "doctor" => Ok(Department::Doctor),
            other => Err(StoreError::InvalidInput(format!(
                "unknown department: {other}"
            ))),
        }
    }

    /// Display label used by presentation surfaces.
    pub fn label(&self) -> &'static str {
        match self {
            Department::Pharmacy => "Pharmacy",
            Department::Lab => "Laboratory",
            Department::Imaging => "Imaging",
            Department::Nursing => "Nursing",
            Department::Doctor => "Physician",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_all_departments() {
        for dept in [
            Department::Pharmacy,
            Department::Lab,
            Department::Imaging,
            Department::Nursing,
            Department::Doctor,
        ] {
            assert_eq!(Department::parse(dept.as_str()).unwrap(), dept);
        }
    }

    #[test]
    fn parse_rejects_unknown_department() {
        let err = Department::parse("cardiology").unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }
}
