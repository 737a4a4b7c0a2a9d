//! Vital-sign log endpoints. Same shape as the history surface: any
//! authenticated role lists, doctors mutate by display position.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use super::MutationOutcome;
use crate::api::error::ApiError;
use crate::api::middleware::session::CurrentUser;
use crate::api::types::ApiContext;
use crate::authorization::{self, RoleRequirement};
use crate::models::{LogEntry, Role};
use crate::records::{self, PatientRecords};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LogListResponse {
    All { patients: Vec<PatientRecords<LogEntry>> },
    Own { logs: Vec<LogEntry> },
}

#[derive(Debug, Deserialize)]
pub struct LogBody {
    pub entry: String,
}

/// `GET /logs`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<LogListResponse>, ApiError> {
    let identity = authorization::require(user.0.as_ref(), RoleRequirement::Authenticated)?;
    let conn = ctx.db()?;

    let response = match identity.role {
        Role::Doctor => LogListResponse::All {
            patients: records::all_logs(&conn)?,
        },
        _ => LogListResponse::Own {
            logs: records::logs_for(&conn, &identity.name)?,
        },
    };
    Ok(Json(response))
}

/// `GET /add_log/:patient`
pub async fn entries(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
    Path(patient): Path<String>,
) -> Result<Json<PatientRecords<LogEntry>>, ApiError> {
    authorization::require(user.0.as_ref(), RoleRequirement::Exactly(Role::Doctor))?;
    let conn = ctx.db()?;
    let entries = records::logs_for(&conn, &patient)?;
    Ok(Json(PatientRecords { patient, entries }))
}

/// `POST /add_log/:patient` — append an entry, creating the patient if
/// absent. Responds with the updated list.
pub async fn append(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
    Path(patient): Path<String>,
    Json(body): Json<LogBody>,
) -> Result<Json<PatientRecords<LogEntry>>, ApiError> {
    authorization::require(user.0.as_ref(), RoleRequirement::Exactly(Role::Doctor))?;
    let conn = ctx.db()?;
    records::append_log(&conn, &patient, &body.entry)?;
    let entries = records::logs_for(&conn, &patient)?;
    Ok(Json(PatientRecords { patient, entries }))
}

/// `POST /edit_log/:patient/:index`
pub async fn edit(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
    Path((patient, index)): Path<(String, usize)>,
    Json(body): Json<LogBody>,
) -> Result<Json<MutationOutcome>, ApiError> {
    authorization::require(user.0.as_ref(), RoleRequirement::Exactly(Role::Doctor))?;
    let conn = ctx.db()?;
    let changed = records::edit_log_at(&conn, &patient, index, &body.entry)?;
    Ok(Json(MutationOutcome { changed }))
}

/// `POST /delete_log/:patient/:index`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
    Path((patient, index)): Path<(String, usize)>,
) -> Result<Json<MutationOutcome>, ApiError> {
    authorization::require(user.0.as_ref(), RoleRequirement::Exactly(Role::Doctor))?;
    let conn = ctx.db()?;
    let changed = records::delete_log_at(&conn, &patient, index)?;
    Ok(Json(MutationOutcome { changed }))
}
