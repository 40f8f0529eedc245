//! Clinical action status lifecycle.
//!
//! The status state machine is validated here, centrally, rather than
//! trusted from caller input. Forward progress is strictly linear
//! (`ordered → acknowledged → in_progress → completed`); cancellation and
//! rejection are exits available from any non-terminal state. `completed`,
//! `cancelled` and `rejected` are terminal: no further transitions are
//! permitted out of them.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a clinical action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Ordered,
    Acknowledged,
    InProgress,
    Completed,
    Cancelled,
    Rejected,
}

impl ActionStatus {
    /// Returns the wire form of the status (`"ordered"`, `"in_progress"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Ordered => "ordered",
            ActionStatus::Acknowledged => "acknowledged",
            ActionStatus::InProgress => "in_progress",
            ActionStatus::Completed => "completed",
            ActionStatus::Cancelled => "cancelled",
            ActionStatus::Rejected => "rejected",
        }
    }

    /// Parses the wire form of a status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] for an unrecognised value.
    pub fn parse(value: &str) -> StoreResult<Self> {
        match value {
            "ordered" => Ok(ActionStatus::Ordered),
            "acknowledged" => Ok(ActionStatus::Acknowledged),
            "in_progress" => Ok(ActionStatus::InProgress),
            "completed" => Ok(ActionStatus::Completed),
            "cancelled" => Ok(ActionStatus::Cancelled),
            "rejected" => Ok(ActionStatus::Rejected),
            other => Err(StoreError::InvalidInput(format!(
                "unknown action status: {other}"
            ))),
        }
    }

    /// Human-readable form used in timeline event titles ("in progress").
    pub fn human(&self) -> &'static str {
        match self {
            ActionStatus::InProgress => "in progress",
            other => other.as_str(),
        }
    }

    /// Whether this status permits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActionStatus::Completed | ActionStatus::Cancelled | ActionStatus::Rejected
        )
    }

    /// The canonical forward-progress map used by the "advance" operation.
    ///
    /// Terminal statuses map to themselves, so advancing a finished action
    /// is a safe no-op rather than an error.
    pub fn advanced(&self) -> ActionStatus {
        match self {
            ActionStatus::Ordered => ActionStatus::Acknowledged,
            ActionStatus::Acknowledged => ActionStatus::InProgress,
            ActionStatus::InProgress => ActionStatus::Completed,
            terminal => *terminal,
        }
    }

    /// Whether `to` is reachable from `self` in one transition.
    pub fn can_transition_to(&self, to: ActionStatus) -> bool {
        use ActionStatus::*;
        matches!(
            (self, to),
            (Ordered, Acknowledged)
                | (Acknowledged, InProgress)
                | (InProgress, Completed)
                | (Ordered | Acknowledged | InProgress, Cancelled | Rejected)
        )
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::ActionStatus::*;

    const ALL: [ActionStatus; 6] = [Ordered, Acknowledged, InProgress, Completed, Cancelled, Rejected];

    #[test]
    fn forward_path_is_strictly_linear() {
        assert!(Ordered.can_transition_to(Acknowledged));
        assert!(Acknowledged.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));

        // Skipping a step is not reachable.
        assert!(!Ordered.can_transition_to(InProgress));
        assert!(!Ordered.can_transition_to(Completed));
        assert!(!Acknowledged.can_transition_to(Completed));
    }

    #[test]
    fn cancel_and_reject_exit_every_non_terminal_state() {
        for from in [Ordered, Acknowledged, InProgress] {
            assert!(from.can_transition_to(Cancelled), "{from} should cancel");
            assert!(from.can_transition_to(Rejected), "{from} should reject");
        }
    }

    #[test]
    fn terminal_states_permit_no_transitions() {
        for from in [Completed, Cancelled, Rejected] {
            for to in ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to} should be refused");
            }
        }
    }

    #[test]
    fn no_backward_transitions() {
        assert!(!Acknowledged.can_transition_to(Ordered));
        assert!(!InProgress.can_transition_to(Acknowledged));
        assert!(!InProgress.can_transition_to(Ordered));
    }

    #[test]
    fn advanced_follows_the_forward_map() {
        assert_eq!(Ordered.advanced(), Acknowledged);
        assert_eq!(Acknowledged.advanced(), InProgress);
        assert_eq!(InProgress.advanced(), Completed);
    }

    #[test]
    fn advanced_is_identity_on_terminal_states() {
        for status in [Completed, Cancelled, Rejected] {
            assert_eq!(status.advanced(), status);
        }
    }

    #[test]
    fn every_status_is_reachable_from_ordered() {
        // Walks the machine from the initial state and collects everything
        // reachable through valid transitions.
        let mut reachable = vec![Ordered];
        let mut frontier = vec![Ordered];
        while let Some(from) = frontier.pop() {
            for to in ALL {
                if from.can_transition_to(to) && !reachable.contains(&to) {
                    reachable.push(to);
                    frontier.push(to);
                }
            }
        }
        for status in ALL {
            assert!(reachable.contains(&status), "{status} unreachable");
        }
    }

    #[test]
    fn wire_form_round_trips() {
        for status in ALL {
            assert_eq!(ActionStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(ActionStatus::parse("done").is_err());
    }

    #[test]
    fn human_form_replaces_underscores() {
        assert_eq!(InProgress.human(), "in progress");
        assert_eq!(Ordered.human(), "ordered");
    }
}
