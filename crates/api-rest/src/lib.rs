//! # API REST
//!
//! REST API implementation for wardflow.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialisation, CORS, status-code mapping)
//!
//! Wire DTOs are kept separate from `wardflow-core` domain types and are
//! stringly-typed at the edges; enum values are parsed into domain types at
//! the handler boundary so that a bad value surfaces as a structured 400
//! rather than a guessable failure deeper in.
//!
//! The store is held behind `Arc<RwLock<…>>`: the write lock serialises each
//! command, which keeps the audit-entry/timeline-event pair indivisible
//! across concurrent requests; racing staff are detected through the
//! per-action version counter (`expected_version` on status updates).

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use wardflow_core::{
    projections, ActionStatus, ActionType, ActionUpdate, AppUser, ClinicalAction, ClinicalStore,
    Department, NewAction, Patient, Priority, StatusChange, StoreError, TimelineEvent, UserRole,
};
use wardflow_types::{NonEmptyText, SlaMinutes};

/// Application state for the REST API server
///
/// Contains shared state that needs to be accessible to all request
/// handlers: the clinical store behind a read/write lock.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<ClinicalStore>>,
}

impl AppState {
    /// Wraps a store for sharing across handlers.
    pub fn new(store: ClinicalStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        get_patient,
        create_action,
        update_action_status,
        advance_action,
        patient_actions,
        patient_timeline,
        department_queue,
    ),
    components(schemas(
        HealthRes,
        PatientRes,
        ListPatientsRes,
        ActionRes,
        ActionUpdateRes,
        ListActionsRes,
        CreateActionReq,
        CreateActionRes,
        UpdateStatusReq,
        AdvanceActionReq,
        TimelineEventRes,
        TimelineRes,
        QueueRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the complete REST router over the given state.
///
/// Includes the Swagger UI at `/swagger-ui` and a permissive CORS layer so
/// the router can back both binaries without further wiring.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients))
        .route("/patients/:id", get(get_patient))
        .route("/patients/:id/actions", get(patient_actions))
        .route("/patients/:id/timeline", get(patient_timeline))
        .route("/actions", post(create_action))
        .route("/actions/:id/status", patch(update_action_status))
        .route("/actions/:id/advance", post(advance_action))
        .route("/departments/:dept/queue", get(department_queue))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct PatientRes {
    pub id: String,
    pub mrn: String,
    pub name: String,
    pub age: u8,
    pub gender: String,
    pub blood_type: String,
    pub admitted_at: String,
    pub room: String,
    pub attending_doctor: String,
    pub allergies: Vec<String>,
    pub current_meds: Vec<String>,
    pub problems: Vec<String>,
    pub diagnosis: String,
}

#[derive(Serialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<PatientRes>,
}

#[derive(Serialize, ToSchema)]
pub struct ActionUpdateRes {
    pub id: String,
    pub action_id: String,
    pub status: String,
    pub note: String,
    pub updated_by: String,
    pub updated_by_role: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ActionRes {
    pub id: String,
    pub patient_id: String,
    pub kind: String,
    pub status: String,
    pub priority: String,
    pub title: String,
    pub instructions: String,
    pub target_department: String,
    pub ordered_by: String,
    pub ordered_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub sla_minutes: i64,
    pub version: u64,
    /// Derived against the server clock at response time; never stored.
    pub overdue: bool,
    pub updates: Vec<ActionUpdateRes>,
}

#[derive(Serialize, ToSchema)]
pub struct ListActionsRes {
    pub actions: Vec<ActionRes>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateActionReq {
    pub patient_id: String,
    pub kind: String,
    pub priority: String,
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    pub target_department: String,
    pub ordered_by: String,
    pub ordered_by_role: String,
    pub sla_minutes: i64,
}

#[derive(Serialize, ToSchema)]
pub struct CreateActionRes {
    pub action_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateStatusReq {
    pub status: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub attachment: Option<String>,
    /// When set, the update is refused with 409 unless the action's current
    /// version matches.
    #[serde(default)]
    pub expected_version: Option<u64>,
    pub updated_by: String,
    pub updated_by_role: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AdvanceActionReq {
    #[serde(default)]
    pub note: String,
    pub updated_by: String,
    pub updated_by_role: String,
}

#[derive(Serialize, ToSchema)]
pub struct TimelineEventRes {
    pub id: String,
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub timestamp: String,
    pub user: String,
    pub user_role: String,
}

#[derive(Serialize, ToSchema)]
pub struct TimelineRes {
    pub events: Vec<TimelineEventRes>,
}

#[derive(Serialize, ToSchema)]
pub struct QueueRes {
    pub department: String,
    pub actions: Vec<ActionRes>,
}

/// Structured failure payload: `error` is the machine-readable kind, and
/// `message` says why, so the client can render the failure without
/// guessing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    pub message: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PatientActionsParams {
    /// Optional projection: `active` (urgency-sorted, excludes
    /// completed/cancelled) or `completed`. Omit for all actions in
    /// creation order.
    pub view: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TimelineParams {
    /// Restrict the timeline to one department.
    pub department: Option<String>,
}

// ============================================================================
// DOMAIN → WIRE TRANSLATION
// ============================================================================

fn patient_res(patient: &Patient) -> PatientRes {
    PatientRes {
        id: patient.id.to_string(),
        mrn: patient.mrn.clone(),
        name: patient.name.clone(),
        age: patient.age,
        gender: patient.gender.as_str().to_string(),
        blood_type: patient.blood_type.clone(),
        admitted_at: patient.admitted_at.to_rfc3339(),
        room: patient.room.clone(),
        attending_doctor: patient.attending_doctor.clone(),
        allergies: patient.allergies.clone(),
        current_meds: patient.current_meds.clone(),
        problems: patient.problems.clone(),
        diagnosis: patient.diagnosis.clone(),
    }
}

fn action_update_res(update: &ActionUpdate) -> ActionUpdateRes {
    ActionUpdateRes {
        id: update.id.to_string(),
        action_id: update.action_id.to_string(),
        status: update.status.as_str().to_string(),
        note: update.note.clone(),
        updated_by: update.updated_by.clone(),
        updated_by_role: update.updated_by_role.as_str().to_string(),
        updated_at: update.updated_at.to_rfc3339(),
        attachment: update.attachment.clone(),
    }
}

fn action_res(action: &ClinicalAction, now: DateTime<Utc>) -> ActionRes {
    ActionRes {
        id: action.id.to_string(),
        patient_id: action.patient_id.to_string(),
        kind: action.kind.as_str().to_string(),
        status: action.status.as_str().to_string(),
        priority: action.priority.as_str().to_string(),
        title: action.title.clone(),
        instructions: action.instructions.clone(),
        target_department: action.target_department.as_str().to_string(),
        ordered_by: action.ordered_by.clone(),
        ordered_at: action.ordered_at.to_rfc3339(),
        acknowledged_at: action.acknowledged_at.map(|t| t.to_rfc3339()),
        completed_at: action.completed_at.map(|t| t.to_rfc3339()),
        sla_minutes: action.sla_minutes.minutes(),
        version: action.version,
        overdue: projections::is_overdue(action, now),
        updates: action.updates.iter().map(action_update_res).collect(),
    }
}

fn timeline_event_res(event: &TimelineEvent) -> TimelineEventRes {
    TimelineEventRes {
        id: event.id.to_string(),
        patient_id: event.patient_id.to_string(),
        action_id: event.action_id.map(|id| id.to_string()),
        kind: event.kind.as_str().to_string(),
        title: event.title.clone(),
        description: event.description.clone(),
        department: event.department.as_str().to_string(),
        priority: event.priority.map(|p| p.as_str().to_string()),
        status: event.status.map(|s| s.as_str().to_string()),
        timestamp: event.timestamp.to_rfc3339(),
        user: event.user.clone(),
        user_role: event.user_role.as_str().to_string(),
    }
}

// ============================================================================
// ERROR MAPPING
// ============================================================================

type ApiError = (StatusCode, Json<ErrorRes>);

/// Maps a store failure onto the HTTP surface.
///
/// Not-found lookups become 404, domain-validation failures 400, and
/// transition/version refusals 409.
fn error_response(err: &StoreError) -> ApiError {
    let (status, kind) = match err {
        StoreError::PatientNotFound(_) | StoreError::ActionNotFound(_) => {
            (StatusCode::NOT_FOUND, "not_found")
        }
        StoreError::InvalidInput(_) | StoreError::RosterRead(_) | StoreError::RosterParse { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_argument")
        }
        StoreError::InvalidTransition { .. } => (StatusCode::CONFLICT, "invalid_transition"),
        StoreError::VersionConflict { .. } => (StatusCode::CONFLICT, "version_conflict"),
    };
    (
        status,
        Json(ErrorRes {
            error: kind.to_string(),
            message: err.to_string(),
        }),
    )
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value).map_err(|_| {
        error_response(&StoreError::InvalidInput(format!(
            "invalid {what} id: {value}"
        )))
    })
}

/// Builds the acting user attributed on write commands.
fn build_actor(name: String, role: String) -> Result<AppUser, ApiError> {
    let name = NonEmptyText::new(name).map_err(|e| error_response(&StoreError::from(e)))?;
    let role = UserRole::parse(&role).map_err(|e| error_response(&e))?;
    Ok(AppUser::new(name, role))
}

// ============================================================================
// HANDLERS
// ============================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the wardflow REST API service.
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "wardflow REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "The patient roster", body = ListPatientsRes)
    )
)]
/// List the patient roster
///
/// Returns every admitted patient known to the store, in roster order.
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> Json<ListPatientsRes> {
    let store = state.store.read().await;
    let patients = store.patients().iter().map(patient_res).collect();
    Json(ListPatientsRes { patients })
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "The patient", body = PatientRes),
        (status = 400, description = "Malformed id", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Fetch one patient by id
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<PatientRes>, ApiError> {
    let patient_id = parse_uuid(&id, "patient")?;
    let store = state.store.read().await;
    let patient = store
        .patient(patient_id)
        .ok_or_else(|| error_response(&StoreError::PatientNotFound(patient_id)))?;
    Ok(Json(patient_res(patient)))
}

#[utoipa::path(
    post,
    path = "/actions",
    request_body = CreateActionReq,
    responses(
        (status = 201, description = "Action created", body = CreateActionRes),
        (status = 400, description = "Invalid argument", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Order a new clinical action
///
/// Creates the action in status `ordered`, routed to the target
/// department's queue, and appends the `action_created` timeline event
/// attributed to the ordering user.
#[axum::debug_handler]
async fn create_action(
    State(state): State<AppState>,
    Json(req): Json<CreateActionReq>,
) -> Result<(StatusCode, Json<CreateActionRes>), ApiError> {
    let actor = build_actor(req.ordered_by, req.ordered_by_role)?;
    let input = NewAction {
        patient_id: parse_uuid(&req.patient_id, "patient")?,
        kind: ActionType::parse(&req.kind).map_err(|e| error_response(&e))?,
        priority: Priority::parse(&req.priority).map_err(|e| error_response(&e))?,
        title: NonEmptyText::new(&req.title).map_err(|e| error_response(&StoreError::from(e)))?,
        instructions: req.instructions,
        target_department: Department::parse(&req.target_department)
            .map_err(|e| error_response(&e))?,
        sla_minutes: SlaMinutes::new(req.sla_minutes)
            .map_err(|e| error_response(&StoreError::from(e)))?,
    };

    let mut store = state.store.write().await;
    match store.create_action(&actor, input) {
        Ok(action_id) => Ok((
            StatusCode::CREATED,
            Json(CreateActionRes {
                action_id: action_id.to_string(),
            }),
        )),
        Err(e) => {
            tracing::error!("Create action error: {:?}", e);
            Err(error_response(&e))
        }
    }
}

#[utoipa::path(
    patch,
    path = "/actions/{id}/status",
    params(("id" = String, Path, description = "Action id")),
    request_body = UpdateStatusReq,
    responses(
        (status = 200, description = "Action after the transition", body = ActionRes),
        (status = 400, description = "Invalid argument", body = ErrorRes),
        (status = 404, description = "Unknown action", body = ErrorRes),
        (status = 409, description = "Transition refused or version conflict", body = ErrorRes)
    )
)]
/// Transition an action to a new status
///
/// A successful transition appends one audit entry to the action and one
/// `status_change` event to the patient's timeline; a refused transition
/// appends neither.
#[axum::debug_handler]
async fn update_action_status(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<UpdateStatusReq>,
) -> Result<Json<ActionRes>, ApiError> {
    let action_id = parse_uuid(&id, "action")?;
    let actor = build_actor(req.updated_by, req.updated_by_role)?;
    let change = StatusChange {
        status: ActionStatus::parse(&req.status).map_err(|e| error_response(&e))?,
        note: req.note,
        attachment: req.attachment,
        expected_version: req.expected_version,
    };

    let mut store = state.store.write().await;
    match store.update_action_status(&actor, action_id, change) {
        Ok(snapshot) => Ok(Json(action_res(&snapshot, Utc::now()))),
        Err(e) => {
            tracing::error!("Update action status error: {:?}", e);
            Err(error_response(&e))
        }
    }
}

#[utoipa::path(
    post,
    path = "/actions/{id}/advance",
    params(("id" = String, Path, description = "Action id")),
    request_body = AdvanceActionReq,
    responses(
        (status = 200, description = "Action after the advance", body = ActionRes),
        (status = 400, description = "Invalid argument", body = ErrorRes),
        (status = 404, description = "Unknown action", body = ErrorRes)
    )
)]
/// Advance an action one step along the canonical forward path
///
/// `ordered → acknowledged → in_progress → completed`. Advancing an action
/// already in a terminal status is a safe no-op that records nothing.
#[axum::debug_handler]
async fn advance_action(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<AdvanceActionReq>,
) -> Result<Json<ActionRes>, ApiError> {
    let action_id = parse_uuid(&id, "action")?;
    let actor = build_actor(req.updated_by, req.updated_by_role)?;

    let mut store = state.store.write().await;
    match store.advance_action(&actor, action_id, req.note) {
        Ok(snapshot) => Ok(Json(action_res(&snapshot, Utc::now()))),
        Err(e) => {
            tracing::error!("Advance action error: {:?}", e);
            Err(error_response(&e))
        }
    }
}

#[utoipa::path(
    get,
    path = "/patients/{id}/actions",
    params(
        ("id" = String, Path, description = "Patient id"),
        PatientActionsParams
    ),
    responses(
        (status = 200, description = "Actions for the patient", body = ListActionsRes),
        (status = 400, description = "Malformed id or view", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// List a patient's actions
///
/// Defaults to creation order. `view=active` applies the urgency-sorted
/// active-tasks projection; `view=completed` the completed strip.
#[axum::debug_handler]
async fn patient_actions(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Query(params): Query<PatientActionsParams>,
) -> Result<Json<ListActionsRes>, ApiError> {
    let patient_id = parse_uuid(&id, "patient")?;
    let store = state.store.read().await;
    if store.patient(patient_id).is_none() {
        return Err(error_response(&StoreError::PatientNotFound(patient_id)));
    }

    let actions = match params.view.as_deref() {
        None => store.actions_for_patient(patient_id),
        Some("active") => store.active_actions_for_patient(patient_id),
        Some("completed") => store.completed_actions_for_patient(patient_id),
        Some(other) => {
            return Err(error_response(&StoreError::InvalidInput(format!(
                "unknown view: {other}"
            ))))
        }
    };

    let now = Utc::now();
    Ok(Json(ListActionsRes {
        actions: actions.into_iter().map(|a| action_res(a, now)).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/timeline",
    params(
        ("id" = String, Path, description = "Patient id"),
        TimelineParams
    ),
    responses(
        (status = 200, description = "Timeline, newest first", body = TimelineRes),
        (status = 400, description = "Malformed id or department", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Read a patient's timeline
///
/// Events are returned newest-first; pass `department=` to restrict to one
/// department's entries.
#[axum::debug_handler]
async fn patient_timeline(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Query(params): Query<TimelineParams>,
) -> Result<Json<TimelineRes>, ApiError> {
    let patient_id = parse_uuid(&id, "patient")?;
    let department = params
        .department
        .as_deref()
        .map(Department::parse)
        .transpose()
        .map_err(|e| error_response(&e))?;

    let store = state.store.read().await;
    if store.patient(patient_id).is_none() {
        return Err(error_response(&StoreError::PatientNotFound(patient_id)));
    }

    let events = store
        .timeline_for_patient(patient_id, department)
        .into_iter()
        .map(timeline_event_res)
        .collect();
    Ok(Json(TimelineRes { events }))
}

#[utoipa::path(
    get,
    path = "/departments/{dept}/queue",
    params(("dept" = String, Path, description = "Department name")),
    responses(
        (status = 200, description = "The department's pending queue", body = QueueRes),
        (status = 400, description = "Unknown department", body = ErrorRes)
    )
)]
/// Read a department's pending work queue
///
/// Includes every non-completed, non-cancelled action routed to the
/// department; rejected actions stay visible until separately resolved.
#[axum::debug_handler]
async fn department_queue(
    State(state): State<AppState>,
    AxumPath(dept): AxumPath<String>,
) -> Result<Json<QueueRes>, ApiError> {
    let department = Department::parse(&dept).map_err(|e| error_response(&e))?;

    let store = state.store.read().await;
    let now = Utc::now();
    let actions = store
        .pending_actions_for_department(department)
        .into_iter()
        .map(|a| action_res(a, now))
        .collect();
    Ok(Json(QueueRes {
        department: department.as_str().to_string(),
        actions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping_matches_the_documented_codes() {
        let not_found = error_response(&StoreError::ActionNotFound(Uuid::new_v4()));
        assert_eq!(not_found.0, StatusCode::NOT_FOUND);
        assert_eq!(not_found.1.error, "not_found");

        let invalid = error_response(&StoreError::InvalidInput("bad".into()));
        assert_eq!(invalid.0, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.1.error, "invalid_argument");

        let transition = error_response(&StoreError::InvalidTransition {
            from: ActionStatus::Ordered,
            to: ActionStatus::Completed,
        });
        assert_eq!(transition.0, StatusCode::CONFLICT);
        assert_eq!(transition.1.error, "invalid_transition");

        let conflict = error_response(&StoreError::VersionConflict {
            expected: 1,
            actual: 2,
        });
        assert_eq!(conflict.0, StatusCode::CONFLICT);
        assert_eq!(conflict.1.error, "version_conflict");
    }

    #[test]
    fn build_actor_rejects_blank_names_and_unknown_roles() {
        assert!(build_actor("  ".into(), "doctor".into()).is_err());
        assert!(build_actor("Dr. Okafor".into(), "porter".into()).is_err());

        let actor = build_actor("Dr. Okafor".into(), "doctor".into()).unwrap();
        assert_eq!(actor.role, UserRole::Doctor);
    }
}
