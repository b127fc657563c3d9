//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::Json;
use feedgrid_db::models::user::{NewUser, UpdateUser, UserBoundary};

use crate::error::AppResult;
use crate::logic;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/users
///
/// Self-registration. The identity domain is the server's own app domain;
/// no role gate applies.
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<NewUser>,
) -> AppResult<Json<DataResponse<UserBoundary>>> {
    let user = logic::users::create_user(&state.pool, &state.config.app_domain, input).await?;
    Ok(Json(DataResponse { data: user }))
}

/// GET /api/v1/users/login/{domain}/{email}
///
/// Login is a plain lookup: the caller learns their stored role and
/// profile, or 404 if unregistered.
pub async fn login(
    State(state): State<AppState>,
    Path((domain, email)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<UserBoundary>>> {
    let user = logic::users::login(&state.pool, &domain, &email).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/users/{domain}/{email}
///
/// Partial profile update. Absent fields, role included, keep their
/// stored values.
pub async fn update_user(
    State(state): State<AppState>,
    Path((domain, email)): Path<(String, String)>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserBoundary>>> {
    let user = logic::users::update_user(&state.pool, &domain, &email, input).await?;
    Ok(Json(DataResponse { data: user }))
}
