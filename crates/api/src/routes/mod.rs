pub mod actions;
pub mod admin;
pub mod elements;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /users                                            create (POST)
/// /users/login/{domain}/{email}                     login (GET)
/// /users/{domain}/{email}                           update (PUT)
///
/// /elements/{managerDomain}/{managerEmail}          create (POST)
/// /elements/{md}/{me}/{domain}/{id}                 update (PUT)
/// /elements/{ud}/{ue}                               list (GET, ?size&page)
/// /elements/{ud}/{ue}/{domain}/{id}                 get (GET)
/// /elements/{ud}/{ue}/search/byName/{name}          search (GET)
/// /elements/{ud}/{ue}/search/byType/{type}          search (GET)
/// /elements/{ud}/{ue}/search/near/{lat}/{lng}/{d}   search (GET)
/// /elements/{ud}/{ue}/search/nearType/{lat}/{lng}/{d}/{type}
/// /elements/{md}/{me}/{domain}/{id}/children        bind child (PUT)
/// /elements/{ud}/{ue}/{domain}/{id}/children        children (GET)
/// /elements/{ud}/{ue}/{domain}/{id}/parents         parents (GET)
///
/// /actions                                          invoke (POST)
///
/// /admin/users/{adminDomain}/{adminEmail}           list, wipe (GET, DELETE)
/// /admin/elements/{adminDomain}/{adminEmail}        wipe (DELETE)
/// /admin/actions/{adminDomain}/{adminEmail}         list, wipe (GET, DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/elements", elements::router())
        .nest("/actions", actions::router())
        .nest("/admin", admin::router())
}
