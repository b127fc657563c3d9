//! Handler for the `/actions` resource.

use axum::extract::State;
use axum::Json;
use feedgrid_db::models::action::{ActionBoundary, InvokeAction};

use crate::error::AppResult;
use crate::logic;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/actions
///
/// Invoke an action on behalf of the player named in `invokedBy`. The
/// accepted action comes back with its server-assigned identity.
pub async fn invoke_action(
    State(state): State<AppState>,
    Json(input): Json<InvokeAction>,
) -> AppResult<Json<DataResponse<ActionBoundary>>> {
    let action =
        logic::actions::invoke_action(&state.pool, &state.config.app_domain, input).await?;
    Ok(Json(DataResponse { data: action }))
}
