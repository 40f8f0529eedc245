//! Derived, UI-ready views over store state.
//!
//! Every presentation surface computes "pending", "active", "overdue" and
//! priority ordering through these functions, so no two surfaces can
//! disagree on what those words mean. All functions are pure: store state
//! in, view out, with the current wall-clock time supplied by the caller
//! where it matters. Nothing here is ever stored back.

use crate::action::ClinicalAction;
use crate::department::Department;
use crate::lifecycle::ActionStatus;
use crate::timeline::TimelineEvent;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// All actions for one patient, in creation order.
pub fn actions_for_patient(actions: &[ClinicalAction], patient_id: Uuid) -> Vec<&ClinicalAction> {
    actions.iter().filter(|a| a.patient_id == patient_id).collect()
}

/// Active tasks for one patient: not completed, not cancelled, most urgent
/// first.
///
/// The sort is stable, so actions of equal priority keep their creation
/// order. Rejected actions stay in this list until separately resolved.
pub fn active_tasks(actions: &[ClinicalAction], patient_id: Uuid) -> Vec<&ClinicalAction> {
    let mut tasks: Vec<&ClinicalAction> = actions
        .iter()
        .filter(|a| {
            a.patient_id == patient_id
                && a.status != ActionStatus::Completed
                && a.status != ActionStatus::Cancelled
        })
        .collect();
    tasks.sort_by_key(|a| a.priority.rank());
    tasks
}

/// Completed tasks for one patient, in creation order.
pub fn completed_tasks(actions: &[ClinicalAction], patient_id: Uuid) -> Vec<&ClinicalAction> {
    actions
        .iter()
        .filter(|a| a.patient_id == patient_id && a.status == ActionStatus::Completed)
        .collect()
}

/// A department's pending work queue: matching department, not completed,
/// not cancelled.
///
/// Rejected actions remain in the queue deliberately: a rejection still
/// needs department awareness until someone resolves it.
pub fn department_queue(actions: &[ClinicalAction], department: Department) -> Vec<&ClinicalAction> {
    actions
        .iter()
        .filter(|a| {
            a.target_department == department
                && a.status != ActionStatus::Completed
                && a.status != ActionStatus::Cancelled
        })
        .collect()
}

/// One patient's timeline, newest first, optionally restricted to a single
/// department.
///
/// Note the asymmetry with [`actions_for_patient`]: timelines read
/// newest-first, task lists read by urgency.
pub fn patient_timeline(
    events: &[TimelineEvent],
    patient_id: Uuid,
    department: Option<Department>,
) -> Vec<&TimelineEvent> {
    let mut timeline: Vec<&TimelineEvent> = events
        .iter()
        .filter(|e| {
            e.patient_id == patient_id && department.map_or(true, |d| e.department == d)
        })
        .collect();
    timeline.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    timeline
}

/// Whether an action has blown its SLA budget.
///
/// True iff the action is still live (not completed, not cancelled) and
/// more than `sla_minutes` have elapsed since it was ordered. Recomputed on
/// every read against the caller's clock; never stored.
pub fn is_overdue(action: &ClinicalAction, now: DateTime<Utc>) -> bool {
    if action.status == ActionStatus::Completed || action.status == ActionStatus::Cancelled {
        return false;
    }
    (now - action.ordered_at).num_minutes() > action.sla_minutes.minutes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionType, Priority};
    use chrono::Duration;
    use wardflow_types::SlaMinutes;

    fn action(
        patient_id: Uuid,
        priority: Priority,
        status: ActionStatus,
        department: Department,
        title: &str,
    ) -> ClinicalAction {
        ClinicalAction {
            id: Uuid::new_v4(),
            patient_id,
            kind: ActionType::Medication,
            status,
            priority,
            title: title.to_string(),
            instructions: String::new(),
            target_department: department,
            ordered_by: "Dr. Okafor".to_string(),
            ordered_at: Utc::now(),
            acknowledged_at: None,
            completed_at: None,
            sla_minutes: SlaMinutes::new(30).unwrap(),
            version: 1,
            updates: Vec::new(),
        }
    }

    fn event(patient_id: Uuid, department: Department, timestamp: DateTime<Utc>) -> TimelineEvent {
        TimelineEvent {
            id: Uuid::new_v4(),
            patient_id,
            action_id: None,
            kind: crate::timeline::TimelineEventKind::Note,
            title: "note".to_string(),
            description: String::new(),
            department,
            priority: None,
            status: None,
            timestamp,
            user: "Nurse Shah".to_string(),
            user_role: crate::user::UserRole::Nurse,
        }
    }

    #[test]
    fn active_tasks_sort_by_priority_with_stable_ties() {
        let patient_id = Uuid::new_v4();
        let actions = vec![
            action(patient_id, Priority::Routine, ActionStatus::Ordered, Department::Lab, "routine"),
            action(patient_id, Priority::Stat, ActionStatus::Ordered, Department::Lab, "stat-1"),
            action(patient_id, Priority::Urgent, ActionStatus::Ordered, Department::Lab, "urgent"),
            action(patient_id, Priority::Stat, ActionStatus::Ordered, Department::Lab, "stat-2"),
        ];

        let titles: Vec<&str> = active_tasks(&actions, patient_id)
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, ["stat-1", "stat-2", "urgent", "routine"]);
    }

    #[test]
    fn active_tasks_exclude_completed_and_cancelled_only() {
        let patient_id = Uuid::new_v4();
        let actions = vec![
            action(patient_id, Priority::Routine, ActionStatus::Completed, Department::Lab, "done"),
            action(patient_id, Priority::Routine, ActionStatus::Cancelled, Department::Lab, "gone"),
            action(patient_id, Priority::Routine, ActionStatus::Rejected, Department::Lab, "pushed back"),
            action(patient_id, Priority::Routine, ActionStatus::InProgress, Department::Lab, "running"),
        ];

        let titles: Vec<&str> = active_tasks(&actions, patient_id)
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, ["pushed back", "running"]);
    }

    #[test]
    fn actions_for_patient_keeps_creation_order() {
        let patient_id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let actions = vec![
            action(patient_id, Priority::Routine, ActionStatus::Ordered, Department::Lab, "first"),
            action(other, Priority::Stat, ActionStatus::Ordered, Department::Lab, "elsewhere"),
            action(patient_id, Priority::Stat, ActionStatus::Ordered, Department::Lab, "second"),
        ];

        let titles: Vec<&str> = actions_for_patient(&actions, patient_id)
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, ["first", "second"]);
    }

    #[test]
    fn department_queue_keeps_rejected_and_drops_finished() {
        let patient_id = Uuid::new_v4();
        let actions = vec![
            action(patient_id, Priority::Stat, ActionStatus::Ordered, Department::Pharmacy, "waiting"),
            action(patient_id, Priority::Stat, ActionStatus::Rejected, Department::Pharmacy, "rejected"),
            action(patient_id, Priority::Stat, ActionStatus::Completed, Department::Pharmacy, "done"),
            action(patient_id, Priority::Stat, ActionStatus::Cancelled, Department::Pharmacy, "gone"),
            action(patient_id, Priority::Stat, ActionStatus::Ordered, Department::Lab, "other dept"),
        ];

        let queue = department_queue(&actions, Department::Pharmacy);
        let titles: Vec<&str> = queue.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["waiting", "rejected"]);
    }

    #[test]
    fn patient_timeline_sorts_newest_first() {
        let patient_id = Uuid::new_v4();
        let base = Utc::now();
        let events = vec![
            event(patient_id, Department::Lab, base - Duration::minutes(30)),
            event(patient_id, Department::Nursing, base),
            event(patient_id, Department::Lab, base - Duration::minutes(10)),
            event(Uuid::new_v4(), Department::Lab, base - Duration::minutes(5)),
        ];

        let timeline = patient_timeline(&events, patient_id, None);
        assert_eq!(timeline.len(), 3);
        for pair in timeline.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn patient_timeline_filters_by_department() {
        let patient_id = Uuid::new_v4();
        let base = Utc::now();
        let events = vec![
            event(patient_id, Department::Lab, base - Duration::minutes(30)),
            event(patient_id, Department::Nursing, base),
            event(patient_id, Department::Lab, base - Duration::minutes(10)),
        ];

        let lab_only = patient_timeline(&events, patient_id, Some(Department::Lab));
        assert_eq!(lab_only.len(), 2);
        assert!(lab_only.iter().all(|e| e.department == Department::Lab));
    }

    #[test]
    fn overdue_requires_live_status_and_blown_budget() {
        let patient_id = Uuid::new_v4();
        let now = Utc::now();

        let mut late = action(patient_id, Priority::Stat, ActionStatus::InProgress, Department::Lab, "late");
        late.ordered_at = now - Duration::minutes(45);
        assert!(is_overdue(&late, now));

        let mut finished = late.clone();
        finished.status = ActionStatus::Completed;
        assert!(!is_overdue(&finished, now));

        let mut cancelled = late.clone();
        cancelled.status = ActionStatus::Cancelled;
        assert!(!is_overdue(&cancelled, now));

        let mut on_time = late.clone();
        on_time.ordered_at = now - Duration::minutes(20);
        assert!(!is_overdue(&on_time, now));
    }

    #[test]
    fn overdue_boundary_is_strictly_greater_than_budget() {
        let patient_id = Uuid::new_v4();
        let now = Utc::now();
        let mut exact = action(patient_id, Priority::Stat, ActionStatus::Ordered, Department::Lab, "exact");
        exact.ordered_at = now - Duration::minutes(30);
        assert!(!is_overdue(&exact, now));
    }
}
