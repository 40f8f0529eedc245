//! Session identity types.
//!
//! The store never authenticates anyone: an external session provider
//! supplies the acting user, and the store reads it only to attribute
//! `ordered_by` / `updated_by` on write commands. Role authorisation (for
//! example stopping a pharmacy user from progressing a nursing action) is
//! deliberately not enforced here.

use crate::department::Department;
use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wardflow_types::NonEmptyText;

/// Professional role of a session user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Doctor,
    Nurse,
    Pharmacy,
    Lab,
    Imaging,
    Admin,
}

impl UserRole {
    /// Returns the wire form of the role (`"doctor"`, `"nurse"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Doctor => "doctor",
            UserRole::Nurse => "nurse",
            UserRole::Pharmacy => "pharmacy",
            UserRole::Lab => "lab",
            UserRole::Imaging => "imaging",
            UserRole::Admin => "admin",
        }
    }

    /// Parses the wire form of a role.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] for an unrecognised value.
    pub fn parse(value: &str) -> StoreResult<Self> {
        match value {
            "doctor" => Ok(UserRole::Doctor),
            "nurse" => Ok(UserRole::Nurse),
            "pharmacy" => Ok(UserRole::Pharmacy),
            "lab" => Ok(UserRole::Lab),
            "imaging" => Ok(UserRole::Imaging),
            "admin" => Ok(UserRole::Admin),
            other => Err(StoreError::InvalidInput(format!("unknown role: {other}"))),
        }
    }

    /// Display label used by presentation surfaces.
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Doctor => "Doctor",
            UserRole::Nurse => "Nurse",
            UserRole::Pharmacy => "Pharmacist",
            UserRole::Lab => "Lab Tech",
            UserRole::Imaging => "Imaging Tech",
            UserRole::Admin => "Admin",
        }
    }

    /// Role-to-department routing table, carried verbatim from the reference
    /// deployment.
    ///
    /// Admin shares the physician department with doctors. Whether that is
    /// intentional (admins see physician-department queues) or a placeholder
    /// is an open product question; do not change it here without
    /// confirmation.
    pub fn home_department(&self) -> Department {
        match self {
            UserRole::Doctor => Department::Doctor,
            UserRole::Nurse => Department::Nursing,
            UserRole::Pharmacy => Department::Pharmacy,
            UserRole::Lab => Department::Lab,
            UserRole::Imaging => Department::Imaging,
            UserRole::Admin => Department::Doctor,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The acting user supplied by the external session provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppUser {
    pub id: Uuid,
    pub name: NonEmptyText,
    pub role: UserRole,
    pub department: Department,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl AppUser {
    /// Creates a session user with a fresh id and the role's home department.
    pub fn new(name: NonEmptyText, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            role,
            department: role.home_department(),
            avatar: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_wire_form() {
        for role in [
            UserRole::Doctor,
            UserRole::Nurse,
            UserRole::Pharmacy,
            UserRole::Lab,
            UserRole::Imaging,
            UserRole::Admin,
        ] {
            assert_eq!(UserRole::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn home_department_matches_reference_table() {
        assert_eq!(UserRole::Doctor.home_department(), Department::Doctor);
        assert_eq!(UserRole::Nurse.home_department(), Department::Nursing);
        assert_eq!(UserRole::Pharmacy.home_department(), Department::Pharmacy);
        assert_eq!(UserRole::Lab.home_department(), Department::Lab);
        assert_eq!(UserRole::Imaging.home_department(), Department::Imaging);
        // Carried from the reference deployment: admins land in the
        // physician department.
        assert_eq!(UserRole::Admin.home_department(), Department::Doctor);
    }

    #[test]
    fn new_user_takes_home_department() {
        let user = AppUser::new(NonEmptyText::new("Priya Shah").unwrap(), UserRole::Nurse);
        assert_eq!(user.department, Department::Nursing);
        assert!(user.avatar.is_none());
    }
}
