//! Portal router.
//!
//! Every route sits behind the session-loading middleware; role gating
//! happens inside the handlers so that each denial renders the same
//! restricted response regardless of cause.
//!
//! Middleware stack (outermost → innermost):
//! 1. Trace → 2. Extension(ApiContext) → 3. Session loader → Handler
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the portal router with the full middleware stack.
pub fn portal_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/", get(endpoints::home::dashboard))
        .route(
            "/login",
            get(endpoints::auth::status).post(endpoints::auth::login),
        )
        .route("/logout", get(endpoints::auth::logout))
        .route("/history", get(endpoints::history::list))
        .route(
            "/add_history/:patient",
            get(endpoints::history::entries).post(endpoints::history::append),
        )
        .route(
            "/edit_history/:patient/:index",
            post(endpoints::history::edit),
        )
        .route(
            "/delete_history/:patient/:index",
            post(endpoints::history::remove),
        )
        .route("/logs", get(endpoints::logs::list))
        .route(
            "/add_log/:patient",
            get(endpoints::logs::entries).post(endpoints::logs::append),
        )
        .route("/edit_log/:patient/:index", post(endpoints::logs::edit))
        .route(
            "/delete_log/:patient/:index",
            post(endpoints::logs::remove),
        )
        .route(
            "/apply_homecare",
            get(endpoints::homecare::view).post(endpoints::homecare::submit),
        )
        .route("/emergency", get(endpoints::emergency::list))
        .route("/emergency/add", post(endpoints::emergency::add))
        .route("/reports", get(endpoints::reports::view))
        .route("/modules", get(endpoints::modules::list))
        .route("/model_editor", get(endpoints::modules::model_editor))
        .with_state(ctx.clone())
        // Innermost first, outermost last; Extension must wrap the
        // session loader so it can extract ApiContext.
        .layer(axum::middleware::from_fn(
            middleware::session::load_session,
        ))
        .layer(axum::Extension(ctx))
        .layer(TraceLayer::new_for_http())
}
