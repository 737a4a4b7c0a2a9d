//! Emergency event workflow — doctor only. Events are append-only and
//! stay in their default status.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::middleware::session::CurrentUser;
use crate::api::types::ApiContext;
use crate::authorization::{self, RoleRequirement};
use crate::models::Role;
use crate::records::{self, EmergencyTicket};

#[derive(Debug, Serialize)]
pub struct EmergencyList {
    pub events: Vec<EmergencyTicket>,
}

#[derive(Debug, Deserialize)]
pub struct EmergencyBody {
    pub patient: String,
    pub event: String,
}

/// `GET /emergency` — every event, most recent first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<EmergencyList>, ApiError> {
    authorization::require(user.0.as_ref(), RoleRequirement::Exactly(Role::Doctor))?;
    let conn = ctx.db()?;
    Ok(Json(EmergencyList {
        events: records::all_emergencies(&conn)?,
    }))
}

/// `POST /emergency/add` — record an event, creating the named patient
/// if it does not exist yet. Responds with the updated list.
pub async fn add(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<EmergencyBody>,
) -> Result<Json<EmergencyList>, ApiError> {
    authorization::require(user.0.as_ref(), RoleRequirement::Exactly(Role::Doctor))?;
    let conn = ctx.db()?;

    records::add_emergency(&conn, &body.patient, &body.event)?;

    Ok(Json(EmergencyList {
        events: records::all_emergencies(&conn)?,
    }))
}
