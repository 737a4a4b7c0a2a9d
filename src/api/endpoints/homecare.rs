//! Homecare workflow — patients submit requests for their own name,
//! doctors review the full queue. The manager has no part here.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::middleware::session::CurrentUser;
use crate::api::types::ApiContext;
use crate::authorization::{self, RoleRequirement};
use crate::models::{HomecareRequest, Role};
use crate::records::{self, HomecareTicket};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum HomecareView {
    Own {
        request_info: Option<HomecareRequest>,
    },
    All {
        requests: Vec<HomecareTicket>,
    },
}

#[derive(Debug, Deserialize)]
pub struct HomecareBody {
    pub reason: String,
}

/// `GET /apply_homecare` — a patient's current request, or the whole
/// queue for a doctor.
pub async fn view(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<HomecareView>, ApiError> {
    let identity = authorization::require(user.0.as_ref(), RoleRequirement::Authenticated)?;
    let conn = ctx.db()?;

    match identity.role {
        Role::Patient => Ok(Json(HomecareView::Own {
            request_info: records::current_homecare(&conn, &identity.name)?,
        })),
        Role::Doctor => Ok(Json(HomecareView::All {
            requests: records::all_homecare(&conn)?,
        })),
        Role::Manager => Err(ApiError::Restricted),
    }
}

/// `POST /apply_homecare` — submit a request for the caller's own
/// name. Always inserts a new pending row; an existing pending request
/// does not block another.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<HomecareBody>,
) -> Result<Json<HomecareView>, ApiError> {
    let identity = authorization::require(user.0.as_ref(), RoleRequirement::Exactly(Role::Patient))?;
    let conn = ctx.db()?;

    records::submit_homecare(&conn, &identity.name, &body.reason)?;

    Ok(Json(HomecareView::Own {
        request_info: records::current_homecare(&conn, &identity.name)?,
    }))
}
