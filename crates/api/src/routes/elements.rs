//! Route definitions for the `/elements` resource.
//!
//! The first two path segments always name the acting user. Create,
//! update, and bind require that user to be a manager; reads accept any
//! manager or player.

use axum::routing::get;
use axum::Router;

use crate::handlers::elements;
use crate::state::AppState;

/// Routes mounted at `/elements`.
///
/// ```text
/// POST   /{domain}/{email}                          -> create_element
/// GET    /{domain}/{email}                          -> list_elements
/// PUT    /{domain}/{email}/{elemDomain}/{elemId}    -> update_element
/// GET    /{domain}/{email}/{elemDomain}/{elemId}    -> get_element
///
/// GET    /{domain}/{email}/search/byName/{name}     -> search_by_name
/// GET    /{domain}/{email}/search/byType/{type}     -> search_by_type
/// GET    /{domain}/{email}/search/near/{lat}/{lng}/{distance}
/// GET    /{domain}/{email}/search/nearType/{lat}/{lng}/{distance}/{type}
///
/// PUT    /{domain}/{email}/{elemDomain}/{elemId}/children -> bind_child
/// GET    /{domain}/{email}/{elemDomain}/{elemId}/children -> get_children
/// GET    /{domain}/{email}/{elemDomain}/{elemId}/parents  -> get_parents
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{domain}/{email}",
            get(elements::list_elements).post(elements::create_element),
        )
        .route(
            "/{domain}/{email}/{elem_domain}/{elem_id}",
            get(elements::get_element).put(elements::update_element),
        )
        // Search endpoints
        .route(
            "/{domain}/{email}/search/byName/{name}",
            get(elements::search_by_name),
        )
        .route(
            "/{domain}/{email}/search/byType/{type}",
            get(elements::search_by_type),
        )
        .route(
            "/{domain}/{email}/search/near/{lat}/{lng}/{distance}",
            get(elements::search_near),
        )
        .route(
            "/{domain}/{email}/search/nearType/{lat}/{lng}/{distance}/{type}",
            get(elements::search_near_type),
        )
        // Hierarchy endpoints
        .route(
            "/{domain}/{email}/{elem_domain}/{elem_id}/children",
            get(elements::get_children).put(elements::bind_child),
        )
        .route(
            "/{domain}/{email}/{elem_domain}/{elem_id}/parents",
            get(elements::get_parents),
        )
}
