//! Login/logout endpoints — establish and clear the session identity.

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::middleware::session::{session_token, CurrentUser};
use crate::api::types::ApiContext;
use crate::models::{Identity, Role};
use crate::records;
use crate::session::{clear_session_cookie, session_cookie};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SessionResponse {
    fn anonymous() -> Self {
        Self {
            authenticated: false,
            role: None,
            name: None,
        }
    }

    fn for_identity(identity: &Identity) -> Self {
        Self {
            authenticated: true,
            role: Some(identity.role),
            name: Some(identity.name.clone()),
        }
    }
}

/// `GET /login` — current session state.
pub async fn status(Extension(user): Extension<CurrentUser>) -> Json<SessionResponse> {
    Json(match &user.0 {
        Some(identity) => SessionResponse::for_identity(identity),
        None => SessionResponse::anonymous(),
    })
}

/// `POST /login` — authenticate against the credential set and
/// establish a session.
///
/// A patient login seeds the patient's store row (a doctor login the
/// doctors table) so the account's subject exists before any record
/// targets it.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let identity = ctx
        .credentials
        .authenticate(&body.username, &body.password)?;

    {
        let conn = ctx.db()?;
        match identity.role {
            Role::Patient => {
                records::ensure_patient(&conn, &identity.name)?;
            }
            Role::Doctor => {
                records::ensure_doctor(&conn, &identity.name)?;
            }
            Role::Manager => {}
        }
    }

    let token = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock poisoned".into()))?;
        sessions.create(identity.clone())
    };

    tracing::info!(user = %identity.name, role = identity.role.as_str(), "login");

    let mut response = Json(SessionResponse::for_identity(&identity)).into_response();
    let cookie = HeaderValue::from_str(&session_cookie(&token))
        .map_err(|_| ApiError::Internal("cookie encoding".into()))?;
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// `GET /logout` — drop the session if one exists and clear the
/// cookie. Idempotent; never fails for an anonymous caller.
pub async fn logout(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = session_token(&headers) {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock poisoned".into()))?;
        sessions.destroy(&token);
    }

    let mut response = Json(SessionResponse::anonymous()).into_response();
    let cookie = HeaderValue::from_str(&clear_session_cookie())
        .map_err(|_| ApiError::Internal("cookie encoding".into()))?;
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}
