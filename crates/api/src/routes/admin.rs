//! Route definitions for the `/admin` surface.
//!
//! Each endpoint names the acting admin in the path; the handlers verify
//! the admin role before touching anything.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users/{domain}/{email}     -> list_users
/// DELETE /users/{domain}/{email}     -> delete_all_users
/// DELETE /elements/{domain}/{email}  -> delete_all_elements
/// GET    /actions/{domain}/{email}   -> list_actions
/// DELETE /actions/{domain}/{email}   -> delete_all_actions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{domain}/{email}",
            get(admin::list_users).delete(admin::delete_all_users),
        )
        .route(
            "/elements/{domain}/{email}",
            axum::routing::delete(admin::delete_all_elements),
        )
        .route(
            "/actions/{domain}/{email}",
            get(admin::list_actions).delete(admin::delete_all_actions),
        )
}
