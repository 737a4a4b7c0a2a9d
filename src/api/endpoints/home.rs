//! Dashboard endpoint — role-specific home data.
//!
//! Doctors see pending homecare requests plus latest metrics for the
//! whole roster; patients see their own latest data and current
//! homecare request; the manager gets an identity echo.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::middleware::session::CurrentUser;
use crate::api::types::ApiContext;
use crate::authorization::{self, RoleRequirement};
use crate::models::{HomecareRequest, Role};
use crate::overview::{self, LatestData, PatientLatest};
use crate::records::{self, HomecareTicket};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DashboardResponse {
    Doctor {
        role: Role,
        name: String,
        pending_homecare: Vec<HomecareTicket>,
        latest_data: Vec<PatientLatest>,
    },
    Patient {
        role: Role,
        name: String,
        latest_data: LatestData,
        homecare_request: Option<HomecareRequest>,
    },
    Manager {
        role: Role,
        name: String,
    },
}

/// `GET /` — dashboard for the logged-in role.
pub async fn dashboard(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let identity = authorization::require(user.0.as_ref(), RoleRequirement::Authenticated)?;
    let conn = ctx.db()?;

    let response = match identity.role {
        Role::Doctor => DashboardResponse::Doctor {
            role: identity.role,
            name: identity.name.clone(),
            pending_homecare: records::pending_homecare(&conn)?,
            latest_data: overview::roster_latest(&conn)?,
        },
        Role::Patient => DashboardResponse::Patient {
            role: identity.role,
            name: identity.name.clone(),
            latest_data: overview::latest_data_for(&conn, &identity.name)?,
            homecare_request: records::current_homecare(&conn, &identity.name)?,
        },
        Role::Manager => DashboardResponse::Manager {
            role: identity.role,
            name: identity.name.clone(),
        },
    };

    Ok(Json(response))
}
