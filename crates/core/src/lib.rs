//! # Wardflow Core
//!
//! Core business logic for the wardflow clinical-coordination service.
//!
//! This crate contains the authoritative session state and pure derivations
//! over it:
//! - The clinical store: commands that create actions and move them through
//!   the status lifecycle, pairing every transition with one audit entry
//!   and one timeline event
//! - The status state machine, validated centrally
//! - Projections: active/completed splits, department queues, newest-first
//!   timelines, SLA-overdue detection
//! - Patient roster loading from JSON
//!
//! **No API concerns**: HTTP serving, OpenAPI documentation, and wire DTOs
//! belong in `api-rest`.

pub mod action;
pub mod department;
pub mod error;
pub mod lifecycle;
pub mod patient;
pub mod projections;
pub mod roster;
pub mod store;
pub mod timeline;
pub mod user;

pub use action::{ActionType, ActionUpdate, ClinicalAction, Priority};
pub use department::Department;
pub use error::{StoreError, StoreResult};
pub use lifecycle::ActionStatus;
pub use patient::{Gender, Patient};
pub use store::{ClinicalStore, NewAction, StatusChange};
pub use timeline::{TimelineEvent, TimelineEventKind};
pub use user::{AppUser, UserRole};
