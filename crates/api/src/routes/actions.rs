//! Route definitions for the `/actions` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::actions;
use crate::state::AppState;

/// Routes mounted at `/actions`.
///
/// ```text
/// POST   /   -> invoke_action
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(actions::invoke_action))
}
