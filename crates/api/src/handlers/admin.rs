//! Handlers for the `/admin` surface: listings over users and the action
//! log, plus the three bulk wipes. Every endpoint takes the admin's
//! identity in the path and verifies the admin role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use feedgrid_db::models::action::ActionBoundary;
use feedgrid_db::models::user::UserBoundary;

use crate::error::AppResult;
use crate::logic;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/users/{adminDomain}/{adminEmail}
///
/// Without `size`/`page` this lists every user; with them, one page.
pub async fn list_users(
    State(state): State<AppState>,
    Path((admin_domain, admin_email)): Path<(String, String)>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Vec<UserBoundary>>>> {
    let page = params.validated_opt()?;
    let users = logic::users::list_users(&state.pool, &admin_domain, &admin_email, page).await?;
    Ok(Json(DataResponse { data: users }))
}

/// DELETE /api/v1/admin/users/{adminDomain}/{adminEmail}
pub async fn delete_all_users(
    State(state): State<AppState>,
    Path((admin_domain, admin_email)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    logic::users::delete_all_users(&state.pool, &admin_domain, &admin_email).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/elements/{adminDomain}/{adminEmail}
pub async fn delete_all_elements(
    State(state): State<AppState>,
    Path((admin_domain, admin_email)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    logic::elements::delete_all_elements(&state.pool, &admin_domain, &admin_email).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/actions/{adminDomain}/{adminEmail}
pub async fn list_actions(
    State(state): State<AppState>,
    Path((admin_domain, admin_email)): Path<(String, String)>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Vec<ActionBoundary>>>> {
    let page = params.validated_opt()?;
    let actions =
        logic::actions::list_actions(&state.pool, &admin_domain, &admin_email, page).await?;
    Ok(Json(DataResponse { data: actions }))
}

/// DELETE /api/v1/admin/actions/{adminDomain}/{adminEmail}
pub async fn delete_all_actions(
    State(state): State<AppState>,
    Path((admin_domain, admin_email)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    logic::actions::delete_all_actions(&state.pool, &admin_domain, &admin_email).await?;
    Ok(StatusCode::NO_CONTENT)
}
