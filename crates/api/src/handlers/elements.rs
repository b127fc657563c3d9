//! Handlers for the `/elements` resource.
//!
//! Every route carries the acting user's identity in the path; the logic
//! layer resolves it to a role and applies the matching visibility.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use feedgrid_db::models::element::{
    BindChild, ElementBoundary, ElementId, ElementPatch, NewElement,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::logic;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn element_id(domain: String, id: Uuid) -> ElementId {
    ElementId { domain, id }
}

/// POST /api/v1/elements/{managerDomain}/{managerEmail}
///
/// Manager-only element creation. The server assigns the identity.
pub async fn create_element(
    State(state): State<AppState>,
    Path((manager_domain, manager_email)): Path<(String, String)>,
    Json(input): Json<NewElement>,
) -> AppResult<Json<DataResponse<ElementBoundary>>> {
    let element = logic::elements::create_element(
        &state.pool,
        &state.config.app_domain,
        &manager_domain,
        &manager_email,
        input,
    )
    .await?;
    Ok(Json(DataResponse { data: element }))
}

/// PUT /api/v1/elements/{managerDomain}/{managerEmail}/{domain}/{id}
///
/// Manager-only partial update. Deactivation sticks: a patch cannot flip
/// an inactive element back to active.
pub async fn update_element(
    State(state): State<AppState>,
    Path((manager_domain, manager_email, domain, id)): Path<(String, String, String, Uuid)>,
    Json(patch): Json<ElementPatch>,
) -> AppResult<Json<DataResponse<ElementBoundary>>> {
    let element = logic::elements::update_element(
        &state.pool,
        &manager_domain,
        &manager_email,
        &element_id(domain, id),
        patch,
    )
    .await?;
    Ok(Json(DataResponse { data: element }))
}

/// GET /api/v1/elements/{userDomain}/{userEmail}/{domain}/{id}
pub async fn get_element(
    State(state): State<AppState>,
    Path((user_domain, user_email, domain, id)): Path<(String, String, String, Uuid)>,
) -> AppResult<Json<DataResponse<ElementBoundary>>> {
    let element = logic::elements::get_element(
        &state.pool,
        &user_domain,
        &user_email,
        &element_id(domain, id),
    )
    .await?;
    Ok(Json(DataResponse { data: element }))
}

/// GET /api/v1/elements/{userDomain}/{userEmail}?size=&page=
pub async fn list_elements(
    State(state): State<AppState>,
    Path((user_domain, user_email)): Path<(String, String)>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Vec<ElementBoundary>>>> {
    let page = params.validated()?;
    let elements =
        logic::elements::list_elements(&state.pool, &user_domain, &user_email, page).await?;
    Ok(Json(DataResponse { data: elements }))
}

/// GET /api/v1/elements/{userDomain}/{userEmail}/search/byName/{name}
pub async fn search_by_name(
    State(state): State<AppState>,
    Path((user_domain, user_email, name)): Path<(String, String, String)>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Vec<ElementBoundary>>>> {
    let page = params.validated()?;
    let elements =
        logic::elements::list_by_name(&state.pool, &user_domain, &user_email, &name, page).await?;
    Ok(Json(DataResponse { data: elements }))
}

/// GET /api/v1/elements/{userDomain}/{userEmail}/search/byType/{type}
pub async fn search_by_type(
    State(state): State<AppState>,
    Path((user_domain, user_email, element_type)): Path<(String, String, String)>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Vec<ElementBoundary>>>> {
    let page = params.validated()?;
    let elements =
        logic::elements::list_by_type(&state.pool, &user_domain, &user_email, &element_type, page)
            .await?;
    Ok(Json(DataResponse { data: elements }))
}

/// GET /api/v1/elements/{userDomain}/{userEmail}/search/near/{lat}/{lng}/{distance}
pub async fn search_near(
    State(state): State<AppState>,
    Path((user_domain, user_email, lat, lng, distance)): Path<(String, String, f64, f64, f64)>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Vec<ElementBoundary>>>> {
    let page = params.validated()?;
    let elements = logic::elements::list_nearby(
        &state.pool,
        &user_domain,
        &user_email,
        lat,
        lng,
        distance,
        page,
    )
    .await?;
    Ok(Json(DataResponse { data: elements }))
}

/// GET /api/v1/elements/{userDomain}/{userEmail}/search/nearType/{lat}/{lng}/{distance}/{type}
pub async fn search_near_type(
    State(state): State<AppState>,
    Path((user_domain, user_email, lat, lng, distance, element_type)): Path<(
        String,
        String,
        f64,
        f64,
        f64,
        String,
    )>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Vec<ElementBoundary>>>> {
    let page = params.validated()?;
    let elements = logic::elements::list_by_type_nearby(
        &state.pool,
        &user_domain,
        &user_email,
        lat,
        lng,
        distance,
        &element_type,
        page,
    )
    .await?;
    Ok(Json(DataResponse { data: elements }))
}

/// PUT /api/v1/elements/{managerDomain}/{managerEmail}/{domain}/{id}/children
///
/// Bind the child named in the body to the parent in the path. Returns
/// 204 No Content; rebinding the same pair is a no-op.
pub async fn bind_child(
    State(state): State<AppState>,
    Path((manager_domain, manager_email, domain, id)): Path<(String, String, String, Uuid)>,
    Json(input): Json<BindChild>,
) -> AppResult<impl IntoResponse> {
    logic::elements::bind_child(
        &state.pool,
        &manager_domain,
        &manager_email,
        &element_id(domain, id),
        &input.element_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/elements/{userDomain}/{userEmail}/{domain}/{id}/children
pub async fn get_children(
    State(state): State<AppState>,
    Path((user_domain, user_email, domain, id)): Path<(String, String, String, Uuid)>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Vec<ElementBoundary>>>> {
    let page = params.validated()?;
    let children = logic::elements::get_children(
        &state.pool,
        &user_domain,
        &user_email,
        &element_id(domain, id),
        page,
    )
    .await?;
    Ok(Json(DataResponse { data: children }))
}

/// GET /api/v1/elements/{userDomain}/{userEmail}/{domain}/{id}/parents
///
/// An element has at most one parent; the array shape keeps the relation
/// endpoints symmetric.
pub async fn get_parents(
    State(state): State<AppState>,
    Path((user_domain, user_email, domain, id)): Path<(String, String, String, Uuid)>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<Vec<ElementBoundary>>>> {
    let page = params.validated()?;
    let parents = logic::elements::get_parent(
        &state.pool,
        &user_domain,
        &user_email,
        &element_id(domain, id),
        page,
    )
    .await?;
    Ok(Json(DataResponse { data: parents }))
}
