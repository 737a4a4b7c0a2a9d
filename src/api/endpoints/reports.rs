//! Aggregate report view — modules, logs and history per patient,
//! plus the latest-metrics mapping.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::middleware::session::CurrentUser;
use crate::api::types::ApiContext;
use crate::authorization::{self, RoleRequirement};
use crate::models::Role;
use crate::overview::{self, PatientLatest};
use crate::reports::{self, PatientReport};

#[derive(Debug, Serialize)]
pub struct ReportsResponse {
    pub is_doctor: bool,
    pub report_data: Vec<PatientReport>,
    pub latest_data: Vec<PatientLatest>,
}

/// `GET /reports` — the whole roster for a doctor, the caller's own
/// name otherwise.
pub async fn view(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ReportsResponse>, ApiError> {
    let identity = authorization::require(user.0.as_ref(), RoleRequirement::Authenticated)?;
    let conn = ctx.db()?;

    if identity.role == Role::Doctor {
        return Ok(Json(ReportsResponse {
            is_doctor: true,
            report_data: reports::roster_reports(&conn)?,
            latest_data: overview::roster_latest(&conn)?,
        }));
    }

    let name = identity.name.clone();
    Ok(Json(ReportsResponse {
        is_doctor: false,
        report_data: vec![reports::report_for(&conn, &name)?],
        latest_data: vec![PatientLatest {
            latest: overview::latest_data_for(&conn, &name)?,
            patient: name,
        }],
    }))
}
