//! Patient-scoped timeline events.
//!
//! The timeline is a read-oriented, append-only log of clinically relevant
//! events for one patient. Events are created by the store as a side effect
//! of domain events (action creation, status transitions) and are never
//! mutated afterwards. Display order is newest-first; see
//! [`crate::projections::patient_timeline`].

use crate::action::Priority;
use crate::department::Department;
use crate::lifecycle::ActionStatus;
use crate::user::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of timeline entry.
///
/// `action_created` and `status_change` are produced by store commands; the
/// remaining kinds cover externally sourced entries (observations, results
/// and alerts fed in by upstream systems).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    ActionCreated,
    StatusChange,
    Note,
    Vitals,
    Result,
    Alert,
}

impl TimelineEventKind {
    /// Returns the wire form of the kind (`"action_created"`, `"vitals"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineEventKind::ActionCreated => "action_created",
            TimelineEventKind::StatusChange => "status_change",
            TimelineEventKind::Note => "note",
            TimelineEventKind::Vitals => "vitals",
            TimelineEventKind::Result => "result",
            TimelineEventKind::Alert => "alert",
        }
    }
}

impl std::fmt::Display for TimelineEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only, patient-scoped log entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: Uuid,
    pub patient_id: Uuid,
    /// Back-reference to the originating action, where there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<Uuid>,
    pub kind: TimelineEventKind,
    pub title: String,
    pub description: String,
    pub department: Department,
    /// Priority snapshot at the time of the event, for action-linked entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Status snapshot at the time of the event, for action-linked entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActionStatus>,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub user_role: UserRole,
}
