use crate::lifecycle::ActionStatus;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown patient: {0}")]
    PatientNotFound(Uuid),
    #[error("unknown action: {0}")]
    ActionNotFound(Uuid),
    #[error("cannot transition action from {from} to {to}")]
    InvalidTransition {
        from: ActionStatus,
        to: ActionStatus,
    },
    #[error("stale action version: expected {expected}, store has {actual}")]
    VersionConflict { expected: u64, actual: u64 },
    #[error("failed to read roster file: {0}")]
    RosterRead(std::io::Error),
    #[error("roster schema mismatch at {path}: {source}")]
    RosterParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<wardflow_types::TextError> for StoreError {
    fn from(err: wardflow_types::TextError) -> Self {
        StoreError::InvalidInput(err.to_string())
    }
}

impl From<wardflow_types::SlaError> for StoreError {
    fn from(err: wardflow_types::SlaError) -> Self {
        StoreError::InvalidInput(err.to_string())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
