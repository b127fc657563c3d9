//! HTTP-level integration tests for `/actions`: the full invoke pipeline
//! from role checks through element mutation, counter upkeep, and the
//! action log.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, delete, get, post_json, TEST_DOMAIN};
use serde_json::{json, Value};
use sqlx::PgPool;

const ADMIN: &str = "admin@feedgrid.io";
const MANAGER: &str = "mgr@feedgrid.io";
const PLAYER: &str = "player@feedgrid.io";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn register(app: Router, email: &str, role: &str) {
    let response = post_json(
        app,
        "/api/v1/users",
        json!({
            "email": email,
            "role": role,
            "username": email.split('@').next().unwrap(),
            "avatar": ":cat:",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn setup_users(app: Router) {
    register(app.clone(), ADMIN, "admin").await;
    register(app.clone(), MANAGER, "manager").await;
    register(app, PLAYER, "player").await;
}

/// Create a feeding area as the manager; returns the element boundary.
async fn create_area(app: Router, name: &str) -> Value {
    let response = post_json(
        app,
        &format!("/api/v1/elements/{TEST_DOMAIN}/{MANAGER}"),
        json!({
            "type": "feeding_area",
            "name": name,
            "location": { "lat": 32.08, "lng": 34.78 },
            "elementAttributes": { "fullFoodBowl": 0, "fullWaterBowl": 0 },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

fn invoke_body(action_type: &str, target: &Value, attrs: Value) -> Value {
    json!({
        "type": action_type,
        "element": { "elementId": target["elementId"] },
        "invokedBy": { "userId": { "domain": TEST_DOMAIN, "email": PLAYER } },
        "actionAttributes": attrs,
    })
}

fn add_food_bowl_attrs(state: bool) -> Value {
    json!({
        "state": state,
        "animal": "cat",
        "brand": "Purrfect",
        "weight": 500,
        "lastFillDate": "2026-08-29",
        "elementName": "bowl-1",
        "managerDomain": TEST_DOMAIN,
        "managerEmail": MANAGER,
        "elementLat": 32.081,
        "elementLng": 34.781,
    })
}

async fn invoke(app: Router, body: Value) -> axum::response::Response {
    post_json(app, "/api/v1/actions", body).await
}

async fn fetch(app: Router, user: &str, element: &Value) -> Value {
    let response = get(
        app,
        &format!(
            "/api/v1/elements/{TEST_DOMAIN}/{user}/{}/{}",
            element["elementId"]["domain"].as_str().unwrap(),
            element["elementId"]["id"].as_str().unwrap(),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

async fn children_of(app: Router, element: &Value) -> Vec<Value> {
    let response = get(
        app,
        &format!(
            "/api/v1/elements/{TEST_DOMAIN}/{MANAGER}/{}/{}/children",
            element["elementId"]["domain"].as_str().unwrap(),
            element["elementId"]["id"].as_str().unwrap(),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Scenario: add a full food bowl
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn add_full_food_bowl_increments_counter(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    let response = invoke(
        app.clone(),
        invoke_body("add-food_bowl", &area, add_food_bowl_attrs(true)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["type"], "add-food_bowl");
    assert_eq!(json["data"]["actionId"]["domain"], TEST_DOMAIN);
    assert_eq!(json["data"]["invokedBy"]["userId"]["email"], PLAYER);

    // The bowl was created under the area with the routing keys stripped.
    let children = children_of(app.clone(), &area).await;
    assert_eq!(children.len(), 1);
    let bowl = &children[0];
    assert_eq!(bowl["type"], "food_bowl");
    assert_eq!(bowl["name"], "bowl-1");
    assert_eq!(bowl["createdBy"]["userId"]["email"], MANAGER);
    assert_eq!(bowl["elementAttributes"]["state"], true);
    assert_eq!(bowl["elementAttributes"]["animal"], "cat");
    assert!(bowl["elementAttributes"].get("elementName").is_none());
    assert!(bowl["elementAttributes"].get("managerEmail").is_none());

    // Full bowl counted on the area.
    let area = fetch(app, MANAGER, &area).await;
    assert_eq!(area["elementAttributes"]["fullFoodBowl"], 1);
    assert_eq!(area["elementAttributes"]["fullWaterBowl"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn add_empty_bowl_leaves_counter_alone(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    let response = invoke(
        app.clone(),
        invoke_body("add-food_bowl", &area, add_food_bowl_attrs(false)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let area = fetch(app, MANAGER, &area).await;
    assert_eq!(area["elementAttributes"]["fullFoodBowl"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn add_water_bowl_counts_separately(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    let response = invoke(
        app.clone(),
        invoke_body(
            "add-water_bowl",
            &area,
            json!({
                "state": true,
                "waterQuality": "fresh",
                "elementName": "water-1",
                "managerDomain": TEST_DOMAIN,
                "managerEmail": MANAGER,
                "elementLat": 32.081,
                "elementLng": 34.781,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let area = fetch(app, MANAGER, &area).await;
    assert_eq!(area["elementAttributes"]["fullFoodBowl"], 0);
    assert_eq!(area["elementAttributes"]["fullWaterBowl"], 1);
}

// ---------------------------------------------------------------------------
// Scenario: refill transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn refill_to_empty_decrements_counter(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    invoke(
        app.clone(),
        invoke_body("add-food_bowl", &area, add_food_bowl_attrs(true)),
    )
    .await;
    let bowl = children_of(app.clone(), &area).await.remove(0);

    let response = invoke(
        app.clone(),
        invoke_body(
            "refill-food_bowl",
            &bowl,
            json!({
                "state": false,
                "animal": "cat",
                "brand": "Purrfect",
                "weight": 0,
                "lastFillDate": "2026-08-29",
                "managerDomain": TEST_DOMAIN,
                "managerEmail": MANAGER,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let bowl = fetch(app.clone(), MANAGER, &bowl).await;
    assert_eq!(bowl["elementAttributes"]["state"], false);

    let area_after_refill = fetch(app.clone(), MANAGER, &area).await;
    assert_eq!(area_after_refill["elementAttributes"]["fullFoodBowl"], 0);

    // Removing the already-empty bowl deactivates it without another decrement.
    let response = invoke(
        app.clone(),
        invoke_body(
            "remove-food_bowl",
            &bowl,
            json!({ "managerDomain": TEST_DOMAIN, "managerEmail": MANAGER }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let bowl = fetch(app.clone(), MANAGER, &bowl).await;
    assert_eq!(bowl["active"], false);

    let area = fetch(app, MANAGER, &area).await;
    assert_eq!(area["elementAttributes"]["fullFoodBowl"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refill_without_state_change_keeps_counter(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    invoke(
        app.clone(),
        invoke_body("add-food_bowl", &area, add_food_bowl_attrs(true)),
    )
    .await;
    let bowl = children_of(app.clone(), &area).await.remove(0);

    // Full before, full after: the counter must not move.
    let response = invoke(
        app.clone(),
        invoke_body(
            "refill-food_bowl",
            &bowl,
            json!({
                "state": true,
                "animal": "cat",
                "brand": "Chomp",
                "weight": 750,
                "lastFillDate": "2026-08-29",
                "managerDomain": TEST_DOMAIN,
                "managerEmail": MANAGER,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let area = fetch(app, MANAGER, &area).await;
    assert_eq!(area["elementAttributes"]["fullFoodBowl"], 1);
}

// ---------------------------------------------------------------------------
// Scenario: removals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn remove_full_bowl_decrements_and_deactivates(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    invoke(
        app.clone(),
        invoke_body("add-food_bowl", &area, add_food_bowl_attrs(true)),
    )
    .await;
    let bowl = children_of(app.clone(), &area).await.remove(0);

    let response = invoke(
        app.clone(),
        invoke_body(
            "remove-food_bowl",
            &bowl,
            json!({ "managerDomain": TEST_DOMAIN, "managerEmail": MANAGER }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let bowl = fetch(app.clone(), MANAGER, &bowl).await;
    assert_eq!(bowl["active"], false);

    let area = fetch(app, MANAGER, &area).await;
    assert_eq!(area["elementAttributes"]["fullFoodBowl"], 0);
}

// ---------------------------------------------------------------------------
// Concurrent counter adjustments
// ---------------------------------------------------------------------------

/// Fires parallel counter adjustments at one feeding area on separate
/// connections. The single-statement `GREATEST` update re-reads the counter
/// under the row lock, so the final value must match the serial outcome.
#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_counter_adjustments_serialize(pool: PgPool) {
    use feedgrid_core::transition::BowlKind;
    use feedgrid_db::repositories::ElementRepo;
    use uuid::Uuid;

    let app = common::build_test_app(pool.clone());
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;
    let domain = area["elementId"]["domain"].as_str().unwrap().to_owned();
    let id = Uuid::parse_str(area["elementId"]["id"].as_str().unwrap()).unwrap();

    let increments: Vec<_> = (0..8)
        .map(|_| {
            let pool = pool.clone();
            let domain = domain.clone();
            tokio::spawn(async move {
                ElementRepo::adjust_counter(&pool, &domain, id, BowlKind::Food, 1).await
            })
        })
        .collect();
    for handle in increments {
        handle.await.unwrap().unwrap();
    }

    let after_increments = fetch(app.clone(), MANAGER, &area).await;
    assert_eq!(after_increments["elementAttributes"]["fullFoodBowl"], 8);

    // More decrements than the counter holds: every interleaving clamps at 0.
    let decrements: Vec<_> = (0..12)
        .map(|_| {
            let pool = pool.clone();
            let domain = domain.clone();
            tokio::spawn(async move {
                ElementRepo::adjust_counter(&pool, &domain, id, BowlKind::Food, -1).await
            })
        })
        .collect();
    for handle in decrements {
        handle.await.unwrap().unwrap();
    }

    let area = fetch(app, MANAGER, &area).await;
    assert_eq!(area["elementAttributes"]["fullFoodBowl"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn remove_feeding_area_cascades_to_children(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    invoke(
        app.clone(),
        invoke_body("add-food_bowl", &area, add_food_bowl_attrs(true)),
    )
    .await;
    invoke(
        app.clone(),
        invoke_body(
            "add-water_bowl",
            &area,
            json!({
                "state": true,
                "waterQuality": "fresh",
                "elementName": "water-1",
                "managerDomain": TEST_DOMAIN,
                "managerEmail": MANAGER,
                "elementLat": 32.081,
                "elementLng": 34.781,
            }),
        ),
    )
    .await;

    let response = invoke(
        app.clone(),
        invoke_body(
            "remove-feeding_area",
            &area,
            json!({ "managerDomain": TEST_DOMAIN, "managerEmail": MANAGER }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let area_after = fetch(app.clone(), MANAGER, &area).await;
    assert_eq!(area_after["active"], false);

    for child in children_of(app.clone(), &area).await {
        assert_eq!(child["active"], false, "child must be deactivated");
    }

    // The area is now invisible to the action path: a second removal 404s.
    let response = invoke(
        app,
        invoke_body(
            "remove-feeding_area",
            &area,
            json!({ "managerDomain": TEST_DOMAIN, "managerEmail": MANAGER }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn invoker_must_be_player(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    let mut body = invoke_body("add-food_bowl", &area, add_food_bowl_attrs(true));
    body["invokedBy"]["userId"]["email"] = json!(MANAGER);

    let response = invoke(app, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "ROLE_MISMATCH");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn routing_manager_must_hold_manager_role(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    let mut attrs = add_food_bowl_attrs(true);
    attrs["managerEmail"] = json!(PLAYER);

    let response = invoke(app, invoke_body("add-food_bowl", &area, attrs)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_action_type_is_invalid_not_forbidden(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    let response = invoke(
        app,
        invoke_body("feed-the-dog", &area, add_food_bowl_attrs(true)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_ACTION");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_payload_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    // add-water_bowl without waterQuality.
    let response = invoke(
        app,
        invoke_body(
            "add-water_bowl",
            &area,
            json!({
                "state": true,
                "elementName": "water-1",
                "managerDomain": TEST_DOMAIN,
                "managerEmail": MANAGER,
                "elementLat": 32.081,
                "elementLng": 34.781,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_ACTION");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn client_supplied_action_id_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    let mut body = invoke_body("add-food_bowl", &area, add_food_bowl_attrs(true));
    body["actionId"] = json!({
        "domain": "rogue",
        "id": "00000000-0000-0000-0000-000000000007",
    });

    let response = invoke(app, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn action_on_unknown_element_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;

    let ghost = json!({
        "elementId": {
            "domain": TEST_DOMAIN,
            "id": "00000000-0000-0000-0000-000000000042",
        }
    });
    let response = invoke(
        app,
        invoke_body("add-food_bowl", &ghost, add_food_bowl_attrs(true)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rejected_action_is_not_logged(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    invoke(
        app.clone(),
        invoke_body("feed-the-dog", &area, add_food_bowl_attrs(true)),
    )
    .await;

    let response = get(
        app,
        &format!("/api/v1/admin/actions/{TEST_DOMAIN}/{ADMIN}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Admin action log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_lists_and_wipes_action_log(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    let area = create_area(app.clone(), "garden").await;

    invoke(
        app.clone(),
        invoke_body("add-food_bowl", &area, add_food_bowl_attrs(true)),
    )
    .await;

    let response = get(
        app.clone(),
        &format!("/api/v1/admin/actions/{TEST_DOMAIN}/{ADMIN}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let actions = json["data"].as_array().unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0]["type"], "add-food_bowl");
    assert_eq!(actions[0]["element"]["elementId"], area["elementId"]);

    let response = delete(
        app.clone(),
        &format!("/api/v1/admin/actions/{TEST_DOMAIN}/{ADMIN}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        app,
        &format!("/api/v1/admin/actions/{TEST_DOMAIN}/{ADMIN}"),
    )
    .await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admin_cannot_read_action_log(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;

    let response = get(
        app,
        &format!("/api/v1/admin/actions/{TEST_DOMAIN}/{MANAGER}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Admin element wipe
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_wipes_all_elements(pool: PgPool) {
    let app = common::build_test_app(pool);
    setup_users(app.clone()).await;
    create_area(app.clone(), "garden").await;

    let response = delete(
        app.clone(),
        &format!("/api/v1/admin/elements/{TEST_DOMAIN}/{ADMIN}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/elements/{TEST_DOMAIN}/{MANAGER}")).await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}
