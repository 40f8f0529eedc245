//! Clinical action entities and their governing enumerations.
//!
//! A clinical action is one ordered intervention tracked from order to
//! resolution. Its audit trail (the `updates` sequence) is append-only and
//! is written exclusively by the store as a side effect of status
//! transitions; the final entry's status always equals the action's current
//! status.

use crate::department::Department;
use crate::error::{StoreError, StoreResult};
use crate::lifecycle::ActionStatus;
use crate::user::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wardflow_types::SlaMinutes;

/// Kind of ordered intervention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Medication,
    LabTest,
    Imaging,
    Procedure,
    Referral,
    NursingTask,
}

impl ActionType {
    /// Returns the wire form of the action type (`"medication"`, `"lab_test"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Medication => "medication",
            ActionType::LabTest => "lab_test",
            ActionType::Imaging => "imaging",
            ActionType::Procedure => "procedure",
            ActionType::Referral => "referral",
            ActionType::NursingTask => "nursing_task",
        }
    }

    /// Parses the wire form of an action type.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] for an unrecognised value.
    pub fn parse(value: &str) -> StoreResult<Self> {
        match value {
            "medication" => Ok(ActionType::Medication),
            "lab_test" => Ok(ActionType::LabTest),
            "imaging" => Ok(ActionType::Imaging),
            "procedure" => Ok(ActionType::Procedure),
            "referral" => Ok(ActionType::Referral),
            "nursing_task" => Ok(ActionType::NursingTask),
            other => Err(StoreError::InvalidInput(format!(
                "unknown action type: {other}"
            ))),
        }
    }

    /// Display label used by presentation surfaces.
    pub fn label(&self) -> &'static str {
        match self {
            ActionType::Medication => "Medication",
            ActionType::LabTest => "Lab Test",
            ActionType::Imaging => "Imaging",
            ActionType::Procedure => "Procedure",
            ActionType::Referral => "Referral",
            ActionType::NursingTask => "Nursing Task",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinical urgency, fixed at creation and never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Stat,
    Urgent,
    Routine,
}

impl Priority {
    /// Returns the wire form of the priority (`"stat"`, `"urgent"`, `"routine"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Stat => "stat",
            Priority::Urgent => "urgent",
            Priority::Routine => "routine",
        }
    }

    /// Parses the wire form of a priority.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] for an unrecognised value.
    pub fn parse(value: &str) -> StoreResult<Self> {
        match value {
            "stat" => Ok(Priority::Stat),
            "urgent" => Ok(Priority::Urgent),
            "routine" => Ok(Priority::Routine),
            other => Err(StoreError::InvalidInput(format!(
                "unknown priority: {other}"
            ))),
        }
    }

    /// Display label used by presentation surfaces.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Stat => "STAT",
            Priority::Urgent => "URGENT",
            Priority::Routine => "Routine",
        }
    }

    /// Sort rank for task lists: stat(0) < urgent(1) < routine(2).
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Stat => 0,
            Priority::Urgent => 1,
            Priority::Routine => 2,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only audit record on a clinical action.
///
/// Created exclusively by the store as a side effect of a status transition
/// on the parent action; never mutated or removed afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionUpdate {
    pub id: Uuid,
    pub action_id: Uuid,
    /// The status transitioned to.
    pub status: ActionStatus,
    pub note: String,
    pub updated_by: String,
    pub updated_by_role: UserRole,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
}

/// A single ordered intervention against a patient.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClinicalAction {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub kind: ActionType,
    pub status: ActionStatus,
    pub priority: Priority,
    pub title: String,
    pub instructions: String,
    pub target_department: Department,
    pub ordered_by: String,
    pub ordered_at: DateTime<Utc>,
    /// Set once when the status first reaches `acknowledged`; never cleared.
    pub acknowledged_at: Option<DateTime<Utc>>,
    /// Set once when the status first reaches `completed`; never cleared.
    pub completed_at: Option<DateTime<Utc>>,
    pub sla_minutes: SlaMinutes,
    /// Optimistic-concurrency counter, incremented on every transition.
    pub version: u64,
    pub updates: Vec<ActionUpdate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_type_wire_form_round_trips() {
        for kind in [
            ActionType::Medication,
            ActionType::LabTest,
            ActionType::Imaging,
            ActionType::Procedure,
            ActionType::Referral,
            ActionType::NursingTask,
        ] {
            assert_eq!(ActionType::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(ActionType::parse("consult").is_err());
    }

    #[test]
    fn priority_rank_orders_stat_first() {
        assert!(Priority::Stat.rank() < Priority::Urgent.rank());
        assert!(Priority::Urgent.rank() < Priority::Routine.rank());
    }

    #[test]
    fn priority_wire_form_round_trips() {
        for priority in [Priority::Stat, Priority::Urgent, Priority::Routine] {
            assert_eq!(Priority::parse(priority.as_str()).unwrap(), priority);
        }
    }
}
