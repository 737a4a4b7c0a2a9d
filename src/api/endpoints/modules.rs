//! Module assignments — the monitoring models attached to patients.
//! Read-only: listing for any authenticated role, the configuration
//! roster for the manager.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::middleware::session::CurrentUser;
use crate::api::types::ApiContext;
use crate::authorization::{self, RoleRequirement};
use crate::models::Role;
use crate::records::{self, ModuleAssignment, PatientRecords};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ModulesResponse {
    All { patients: Vec<PatientRecords<String>> },
    Own { modules: Vec<String> },
}

/// `GET /modules`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ModulesResponse>, ApiError> {
    let identity = authorization::require(user.0.as_ref(), RoleRequirement::Authenticated)?;
    let conn = ctx.db()?;

    let response = match identity.role {
        Role::Doctor => ModulesResponse::All {
            patients: records::all_modules(&conn)?,
        },
        _ => ModulesResponse::Own {
            modules: records::modules_for(&conn, &identity.name)?,
        },
    };
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct ModelEditorResponse {
    pub assignments: Vec<ModuleAssignment>,
}

/// `GET /model_editor` — manager-only configuration surface: every
/// patient row with its assigned modules.
pub async fn model_editor(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ModelEditorResponse>, ApiError> {
    authorization::require(user.0.as_ref(), RoleRequirement::Exactly(Role::Manager))?;
    let conn = ctx.db()?;
    Ok(Json(ModelEditorResponse {
        assignments: records::module_roster(&conn)?,
    }))
}
