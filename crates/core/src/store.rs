//! The clinical store.
//!
//! Owns the authoritative collections of clinical actions and timeline
//! events for one session. Commands validate their inputs in full before
//! touching either collection, so a rejected command leaves no partial
//! mutation behind; a successful transition appends exactly one audit entry
//! to the action and exactly one timeline event, together.
//!
//! The store is an explicitly owned instance with lifecycle
//! initialise (load or seed roster) → serve commands/queries → drop. There
//! is no process-wide singleton; callers that need shared access wrap it in
//! their own handle. Commands take `&mut self`, which is what makes the
//! audit-entry/timeline-event pair indivisible for a single writer; a
//! multi-writer deployment must serialise commands through one exclusive
//! reference and can use [`StatusChange::expected_version`] to detect races.

use crate::action::{ActionType, ActionUpdate, ClinicalAction, Priority};
use crate::department::Department;
use crate::error::{StoreError, StoreResult};
use crate::lifecycle::ActionStatus;
use crate::patient::Patient;
use crate::projections;
use crate::timeline::{TimelineEvent, TimelineEventKind};
use crate::user::AppUser;
use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;
use wardflow_types::{NonEmptyText, SlaMinutes};

/// Input for [`ClinicalStore::create_action`].
///
/// `title` and `sla_minutes` carry their validation in the type: an empty
/// title or a non-positive budget cannot be represented.
#[derive(Clone, Debug)]
pub struct NewAction {
    pub patient_id: Uuid,
    pub kind: ActionType,
    pub priority: Priority,
    pub title: NonEmptyText,
    pub instructions: String,
    pub target_department: Department,
    pub sla_minutes: SlaMinutes,
}

/// Input for [`ClinicalStore::update_action_status`].
#[derive(Clone, Debug)]
pub struct StatusChange {
    /// The status to transition to.
    pub status: ActionStatus,
    /// Attributed free-text note; may be empty.
    pub note: String,
    /// Optional attachment reference recorded on the audit entry.
    pub attachment: Option<String>,
    /// When set, the transition is refused unless the action's current
    /// version matches. Lets racing staff detect that someone else moved
    /// the action first instead of silently stacking on top of it.
    pub expected_version: Option<u64>,
}

impl StatusChange {
    /// A plain transition with no attachment and no version check.
    pub fn to(status: ActionStatus, note: impl Into<String>) -> Self {
        Self {
            status,
            note: note.into(),
            attachment: None,
            expected_version: None,
        }
    }
}

/// Authoritative session state: patient roster, actions and timeline.
#[derive(Debug, Default)]
pub struct ClinicalStore {
    patients: Vec<Patient>,
    actions: Vec<ClinicalAction>,
    timeline: Vec<TimelineEvent>,
}

impl ClinicalStore {
    /// Initialises a store over the given patient roster.
    ///
    /// The roster is reference data: the store never mutates it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] if two roster entries share an
    /// id or a medical record number.
    pub fn new(patients: Vec<Patient>) -> StoreResult<Self> {
        let mut ids = HashSet::new();
        let mut mrns = HashSet::new();
        for patient in &patients {
            if !ids.insert(patient.id) {
                return Err(StoreError::InvalidInput(format!(
                    "duplicate patient id in roster: {}",
                    patient.id
                )));
            }
            if !mrns.insert(patient.mrn.as_str()) {
                return Err(StoreError::InvalidInput(format!(
                    "duplicate MRN in roster: {}",
                    patient.mrn
                )));
            }
        }

        Ok(Self {
            patients,
            actions: Vec::new(),
            timeline: Vec::new(),
        })
    }

    /// The patient roster, in roster order.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Looks up one patient by id.
    pub fn patient(&self, patient_id: Uuid) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == patient_id)
    }

    /// All actions, in creation order.
    pub fn actions(&self) -> &[ClinicalAction] {
        &self.actions
    }

    /// Looks up one action by id.
    pub fn action(&self, action_id: Uuid) -> Option<&ClinicalAction> {
        self.actions.iter().find(|a| a.id == action_id)
    }

    /// The full session timeline, in creation order.
    pub fn timeline(&self) -> &[TimelineEvent] {
        &self.timeline
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    /// Creates a new clinical action and its `action_created` timeline event.
    ///
    /// The action starts in status `ordered` with an empty audit trail,
    /// attributed to `actor` as the ordering user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PatientNotFound`] if `input.patient_id` is not
    /// in the roster.
    ///
    /// # Returns
    ///
    /// The created action's id.
    pub fn create_action(&mut self, actor: &AppUser, input: NewAction) -> StoreResult<Uuid> {
        if self.patient(input.patient_id).is_none() {
            return Err(StoreError::PatientNotFound(input.patient_id));
        }

        let now = Utc::now();
        let action_id = Uuid::new_v4();
        let title = input.title.as_str().to_owned();

        let action = ClinicalAction {
            id: action_id,
            patient_id: input.patient_id,
            kind: input.kind,
            status: ActionStatus::Ordered,
            priority: input.priority,
            title: title.clone(),
            instructions: input.instructions.clone(),
            target_department: input.target_department,
            ordered_by: actor.name.to_string(),
            ordered_at: now,
            acknowledged_at: None,
            completed_at: None,
            sla_minutes: input.sla_minutes,
            version: 1,
            updates: Vec::new(),
        };

        let event = TimelineEvent {
            id: Uuid::new_v4(),
            patient_id: input.patient_id,
            action_id: Some(action_id),
            kind: TimelineEventKind::ActionCreated,
            title,
            description: input.instructions,
            department: input.target_department,
            priority: Some(input.priority),
            status: Some(ActionStatus::Ordered),
            timestamp: now,
            user: actor.name.to_string(),
            user_role: actor.role,
        };

        self.actions.push(action);
        self.timeline.push(event);

        tracing::debug!(action = %action_id, patient = %input.patient_id, "created clinical action");
        Ok(action_id)
    }

    /// Transitions an action to a new status.
    ///
    /// On success this sets the status, stamps `acknowledged_at` /
    /// `completed_at` the first time those statuses are reached, increments
    /// the version counter, and appends one audit entry plus one
    /// `status_change` timeline event. A failed call appends neither.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ActionNotFound`] for an unknown action id.
    /// - [`StoreError::VersionConflict`] when `change.expected_version` is
    ///   set and does not match the action's current version.
    /// - [`StoreError::InvalidTransition`] when the requested status is not
    ///   reachable from the current one, including any transition out of a
    ///   terminal status.
    ///
    /// # Returns
    ///
    /// A snapshot of the action after the transition.
    pub fn update_action_status(
        &mut self,
        actor: &AppUser,
        action_id: Uuid,
        change: StatusChange,
    ) -> StoreResult<ClinicalAction> {
        let index = self
            .actions
            .iter()
            .position(|a| a.id == action_id)
            .ok_or(StoreError::ActionNotFound(action_id))?;

        // Validate in full before mutating anything.
        let from = self.actions[index].status;
        if let Some(expected) = change.expected_version {
            let actual = self.actions[index].version;
            if expected != actual {
                return Err(StoreError::VersionConflict { expected, actual });
            }
        }
        if !from.can_transition_to(change.status) {
            return Err(StoreError::InvalidTransition {
                from,
                to: change.status,
            });
        }

        let now = Utc::now();
        let action = &mut self.actions[index];
        action.status = change.status;
        if change.status == ActionStatus::Acknowledged && action.acknowledged_at.is_none() {
            action.acknowledged_at = Some(now);
        }
        if change.status == ActionStatus::Completed && action.completed_at.is_none() {
            action.completed_at = Some(now);
        }
        action.version += 1;
        action.updates.push(ActionUpdate {
            id: Uuid::new_v4(),
            action_id,
            status: change.status,
            note: change.note.clone(),
            updated_by: actor.name.to_string(),
            updated_by_role: actor.role,
            updated_at: now,
            attachment: change.attachment,
        });

        let event = TimelineEvent {
            id: Uuid::new_v4(),
            patient_id: action.patient_id,
            action_id: Some(action_id),
            kind: TimelineEventKind::StatusChange,
            title: format!("{} — {}", action.title, change.status.human()),
            description: change.note,
            department: action.target_department,
            priority: Some(action.priority),
            status: Some(change.status),
            timestamp: now,
            user: actor.name.to_string(),
            user_role: actor.role,
        };
        let snapshot = action.clone();
        self.timeline.push(event);

        tracing::debug!(action = %action_id, %from, to = %snapshot.status, "action status changed");
        Ok(snapshot)
    }

    /// Applies the canonical forward-progress map to an action.
    ///
    /// Terminal statuses advance to themselves: the call is a safe no-op
    /// that appends no audit entry and no timeline event, and does not bump
    /// the version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ActionNotFound`] for an unknown action id.
    ///
    /// # Returns
    ///
    /// A snapshot of the action after the (possibly no-op) advance.
    pub fn advance_action(
        &mut self,
        actor: &AppUser,
        action_id: Uuid,
        note: impl Into<String>,
    ) -> StoreResult<ClinicalAction> {
        let action = self
            .actions
            .iter()
            .find(|a| a.id == action_id)
            .ok_or(StoreError::ActionNotFound(action_id))?;

        let next = action.status.advanced();
        if next == action.status {
            return Ok(action.clone());
        }

        self.update_action_status(actor, action_id, StatusChange::to(next, note))
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// All actions for one patient, in creation order.
    pub fn actions_for_patient(&self, patient_id: Uuid) -> Vec<&ClinicalAction> {
        projections::actions_for_patient(&self.actions, patient_id)
    }

    /// Active (not completed, not cancelled) actions for one patient, most
    /// urgent first.
    pub fn active_actions_for_patient(&self, patient_id: Uuid) -> Vec<&ClinicalAction> {
        projections::active_tasks(&self.actions, patient_id)
    }

    /// Completed actions for one patient, in creation order.
    pub fn completed_actions_for_patient(&self, patient_id: Uuid) -> Vec<&ClinicalAction> {
        projections::completed_tasks(&self.actions, patient_id)
    }

    /// One patient's timeline, newest first, optionally restricted to a
    /// single department.
    pub fn timeline_for_patient(
        &self,
        patient_id: Uuid,
        department: Option<Department>,
    ) -> Vec<&TimelineEvent> {
        projections::patient_timeline(&self.timeline, patient_id, department)
    }

    /// A department's pending work queue.
    pub fn pending_actions_for_department(&self, department: Department) -> Vec<&ClinicalAction> {
        projections::department_queue(&self.actions, department)
    }
}
