//! History endpoints — listing for any authenticated role, positional
//! CRUD for doctors.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use super::MutationOutcome;
use crate::api::error::ApiError;
use crate::api::middleware::session::CurrentUser;
use crate::api::types::ApiContext;
use crate::authorization::{self, RoleRequirement};
use crate::models::{HistoryEntry, Role};
use crate::records::{self, PatientRecords};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum HistoryListResponse {
    All { patients: Vec<PatientRecords<HistoryEntry>> },
    Own { history: Vec<HistoryEntry> },
}

#[derive(Debug, Deserialize)]
pub struct HistoryBody {
    pub report: String,
}

/// `GET /history` — a doctor sees every roster patient's histories,
/// anyone else their own name's.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<HistoryListResponse>, ApiError> {
    let identity = authorization::require(user.0.as_ref(), RoleRequirement::Authenticated)?;
    let conn = ctx.db()?;

    let response = match identity.role {
        Role::Doctor => HistoryListResponse::All {
            patients: records::all_histories(&conn)?,
        },
        _ => HistoryListResponse::Own {
            history: records::histories_for(&conn, &identity.name)?,
        },
    };
    Ok(Json(response))
}

/// `GET /add_history/:patient` — the entries a doctor is about to
/// extend.
pub async fn entries(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
    Path(patient): Path<String>,
) -> Result<Json<PatientRecords<HistoryEntry>>, ApiError> {
    authorization::require(user.0.as_ref(), RoleRequirement::Exactly(Role::Doctor))?;
    let conn = ctx.db()?;
    let entries = records::histories_for(&conn, &patient)?;
    Ok(Json(PatientRecords { patient, entries }))
}

/// `POST /add_history/:patient` — append a note, creating the patient
/// if absent. Responds with the updated list.
pub async fn append(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
    Path(patient): Path<String>,
    Json(body): Json<HistoryBody>,
) -> Result<Json<PatientRecords<HistoryEntry>>, ApiError> {
    authorization::require(user.0.as_ref(), RoleRequirement::Exactly(Role::Doctor))?;
    let conn = ctx.db()?;
    records::append_history(&conn, &patient, &body.report)?;
    let entries = records::histories_for(&conn, &patient)?;
    Ok(Json(PatientRecords { patient, entries }))
}

/// `POST /edit_history/:patient/:index`
pub async fn edit(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
    Path((patient, index)): Path<(String, usize)>,
    Json(body): Json<HistoryBody>,
) -> Result<Json<MutationOutcome>, ApiError> {
    authorization::require(user.0.as_ref(), RoleRequirement::Exactly(Role::Doctor))?;
    let conn = ctx.db()?;
    let changed = records::edit_history_at(&conn, &patient, index, &body.report)?;
    Ok(Json(MutationOutcome { changed }))
}

/// `POST /delete_history/:patient/:index`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
    Path((patient, index)): Path<(String, usize)>,
) -> Result<Json<MutationOutcome>, ApiError> {
    authorization::require(user.0.as_ref(), RoleRequirement::Exactly(Role::Doctor))?;
    let conn = ctx.db()?;
    let changed = records::delete_history_at(&conn, &patient, index)?;
    Ok(Json(MutationOutcome { changed }))
}
