//! Session cookie middleware.
//!
//! Resolves the `portal_session` cookie to an identity and injects
//! `CurrentUser` into request extensions. It never rejects a request:
//! the access gate decides per route, so anonymous and wrong-role
//! callers receive the same restricted response from the handlers.

use axum::body::Body;
use axum::http::{header, HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::Identity;
use crate::session::SESSION_COOKIE;

/// The caller's session identity, if any. Present in request
/// extensions on every route behind the middleware.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<Identity>);

/// Attach the session identity (or its absence) to the request.
///
/// Accesses `ApiContext` from request extensions (injected by the
/// Extension layer).
pub async fn load_session(req: Request<Body>, next: Next) -> Response {
    match load_session_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn load_session_inner(
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let identity = match session_token(req.headers()) {
        Some(token) => ctx.session_identity(&token)?,
        None => None,
    };

    req.extensions_mut().insert(CurrentUser(identity));
    Ok(next.run(req).await)
}

/// Extract the session token from the Cookie header, if present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}
