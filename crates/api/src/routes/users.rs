//! Route definitions for the `/users` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST   /                        -> create_user
/// GET    /login/{domain}/{email}  -> login
/// PUT    /{domain}/{email}        -> update_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(users::create_user))
        .route("/login/{domain}/{email}", get(users::login))
        .route("/{domain}/{email}", put(users::update_user))
}
