//! Element service: creation, patching, role-filtered reads and searches,
//! and parent/child binding.
//!
//! Visibility rule used throughout: managers see every element, players
//! see only active ones, any other role is a role mismatch.

use feedgrid_core::action::Attributes;
use feedgrid_core::error::CoreError;
use feedgrid_core::pagination::PageRequest;
use feedgrid_core::roles::Role;
use feedgrid_core::types::TYPE_FEEDING_AREA;
use feedgrid_db::models::element::{
    ElementBoundary, ElementId, ElementPatch, ElementRow, InsertElement, NewElement,
};
use feedgrid_db::repositories::ElementRepo;
use feedgrid_db::DbPool;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::logic::users;

/// How much of the element store a role may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Managers: everything, inactive rows included.
    All,
    /// Players: active rows only.
    ActiveOnly,
}

impl Visibility {
    pub fn only_active(&self) -> bool {
        matches!(self, Visibility::ActiveOnly)
    }
}

/// Resolve the acting user's visibility, rejecting roles with no element
/// read access.
pub async fn visibility_of(
    executor: impl PgExecutor<'_>,
    domain: &str,
    email: &str,
    operation: &'static str,
) -> AppResult<Visibility> {
    match users::role_of(executor, domain, email).await? {
        Some(Role::Manager) => Ok(Visibility::All),
        Some(Role::Player) => Ok(Visibility::ActiveOnly),
        _ => Err(AppError::Core(CoreError::RoleMismatch {
            user: format!("{domain}/{email}"),
            operation,
        })),
    }
}

/// Counter attribute keys that live in typed columns, never in the stored
/// attribute map.
const COUNTER_KEYS: [&str; 2] = ["fullFoodBowl", "fullWaterBowl"];

/// Pull feeding-area counters out of an attribute map into typed values.
/// Non-feeding-area types keep zeroed counters.
fn split_counters(element_type: &str, mut attributes: Attributes) -> (Attributes, i64, i64) {
    let mut food = 0;
    let mut water = 0;
    if element_type == TYPE_FEEDING_AREA {
        food = counter_value(&attributes, "fullFoodBowl");
        water = counter_value(&attributes, "fullWaterBowl");
    }
    for key in COUNTER_KEYS {
        attributes.remove(key);
    }
    (attributes, food, water)
}

fn counter_value(attributes: &Attributes, key: &str) -> i64 {
    match attributes.get(key) {
        Some(serde_json::Value::Number(n)) => n.as_i64().unwrap_or(0).max(0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0).max(0),
        _ => 0,
    }
}

/// Manager-only element creation. The identity is always server-assigned;
/// a caller-supplied one is a conflict.
pub async fn create_element(
    pool: &DbPool,
    app_domain: &str,
    manager_domain: &str,
    manager_email: &str,
    input: NewElement,
) -> AppResult<ElementBoundary> {
    users::require_role(pool, manager_domain, manager_email, Role::Manager, "createElement")
        .await?;

    if let Some(id) = &input.element_id {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "element identity {}/{} must be server-assigned",
            id.domain, id.id
        ))));
    }

    let (attributes, food, water) = split_counters(&input.element_type, input.element_attributes);
    let insert = InsertElement {
        domain: app_domain.to_string(),
        id: Uuid::new_v4(),
        element_type: input.element_type,
        name: input.name,
        active: input.active.unwrap_or(true),
        lat: input.location.lat,
        lng: input.location.lng,
        created_by_domain: manager_domain.to_string(),
        created_by_email: manager_email.to_string(),
        attributes,
        parent_domain: None,
        parent_id: None,
        full_food_bowls: food,
        full_water_bowls: water,
    };

    let row = ElementRepo::insert(pool, &insert).await?;
    tracing::info!(
        domain = %row.domain, id = %row.id, element_type = %row.element_type,
        "Element created"
    );
    Ok(row.into())
}

/// Manager-only partial patch. Deactivation is sticky: a patch cannot
/// flip an inactive element back to active.
pub async fn update_element(
    pool: &DbPool,
    manager_domain: &str,
    manager_email: &str,
    element: &ElementId,
    mut patch: ElementPatch,
) -> AppResult<ElementBoundary> {
    users::require_role(pool, manager_domain, manager_email, Role::Manager, "updateElement")
        .await?;

    let existing = ElementRepo::find(pool, &element.domain, element.id)
        .await?
        .ok_or_else(|| not_found(element))?;

    if !existing.active && patch.active == Some(true) {
        tracing::warn!(domain = %element.domain, id = %element.id, "Ignoring reactivation of inactive element");
        patch.active = None;
    }

    // Counter attributes are backed by typed columns; keep shadow copies
    // out of the stored map.
    if let Some(attributes) = patch.element_attributes.as_mut() {
        for key in COUNTER_KEYS {
            attributes.remove(key);
        }
    }

    let row = ElementRepo::update(pool, &element.domain, element.id, &patch)
        .await?
        .ok_or_else(|| not_found(element))?;
    tracing::info!(domain = %row.domain, id = %row.id, "Element updated");
    Ok(row.into())
}

/// Fetch one element under the acting user's visibility; an inactive
/// element is not found for players.
pub async fn get_element(
    pool: &DbPool,
    user_domain: &str,
    user_email: &str,
    element: &ElementId,
) -> AppResult<ElementBoundary> {
    let visibility = visibility_of(pool, user_domain, user_email, "getElement").await?;
    let row = ElementRepo::find(pool, &element.domain, element.id)
        .await?
        .ok_or_else(|| not_found(element))?;
    if visibility.only_active() && !row.active {
        return Err(not_found(element));
    }
    Ok(row.into())
}

/// List one page of elements under the acting user's visibility.
pub async fn list_elements(
    pool: &DbPool,
    user_domain: &str,
    user_email: &str,
    page: PageRequest,
) -> AppResult<Vec<ElementBoundary>> {
    let visibility = visibility_of(pool, user_domain, user_email, "listElements").await?;
    let rows = ElementRepo::list(pool, visibility.only_active(), page.limit(), page.offset()).await?;
    Ok(into_boundaries(rows))
}

/// Search by name pattern.
pub async fn list_by_name(
    pool: &DbPool,
    user_domain: &str,
    user_email: &str,
    name: &str,
    page: PageRequest,
) -> AppResult<Vec<ElementBoundary>> {
    let visibility = visibility_of(pool, user_domain, user_email, "listByName").await?;
    let rows = ElementRepo::list_by_name(
        pool,
        name,
        visibility.only_active(),
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(into_boundaries(rows))
}

/// Search by type pattern.
pub async fn list_by_type(
    pool: &DbPool,
    user_domain: &str,
    user_email: &str,
    element_type: &str,
    page: PageRequest,
) -> AppResult<Vec<ElementBoundary>> {
    let visibility = visibility_of(pool, user_domain, user_email, "listByType").await?;
    let rows = ElementRepo::list_by_type(
        pool,
        element_type,
        visibility.only_active(),
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(into_boundaries(rows))
}

/// Bounding-box search around a point.
pub async fn list_nearby(
    pool: &DbPool,
    user_domain: &str,
    user_email: &str,
    lat: f64,
    lng: f64,
    distance: f64,
    page: PageRequest,
) -> AppResult<Vec<ElementBoundary>> {
    let visibility = visibility_of(pool, user_domain, user_email, "listNearby").await?;
    let rows = ElementRepo::list_nearby(
        pool,
        lat,
        lng,
        distance,
        visibility.only_active(),
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(into_boundaries(rows))
}

/// Bounding-box search narrowed by a type pattern.
#[allow(clippy::too_many_arguments)]
pub async fn list_by_type_nearby(
    pool: &DbPool,
    user_domain: &str,
    user_email: &str,
    lat: f64,
    lng: f64,
    distance: f64,
    element_type: &str,
    page: PageRequest,
) -> AppResult<Vec<ElementBoundary>> {
    let visibility = visibility_of(pool, user_domain, user_email, "listByTypeNearby").await?;
    let rows = ElementRepo::list_by_type_nearby(
        pool,
        lat,
        lng,
        distance,
        element_type,
        visibility.only_active(),
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(into_boundaries(rows))
}

/// Manager-only: bind `child` under `parent`. Re-binding the same pair is
/// idempotent.
pub async fn bind_child(
    pool: &DbPool,
    manager_domain: &str,
    manager_email: &str,
    parent: &ElementId,
    child: &ElementId,
) -> AppResult<()> {
    users::require_role(pool, manager_domain, manager_email, Role::Manager, "bindChild").await?;

    ElementRepo::find(pool, &parent.domain, parent.id)
        .await?
        .ok_or_else(|| not_found(parent))?;

    let bound = ElementRepo::set_parent(pool, &child.domain, child.id, &parent.domain, parent.id)
        .await?;
    if !bound {
        return Err(not_found(child));
    }
    tracing::info!(
        parent = %format!("{}/{}", parent.domain, parent.id),
        child = %format!("{}/{}", child.domain, child.id),
        "Child bound to parent"
    );
    Ok(())
}

/// List one page of an element's direct children under the acting user's
/// visibility.
pub async fn get_children(
    pool: &DbPool,
    user_domain: &str,
    user_email: &str,
    parent: &ElementId,
    page: PageRequest,
) -> AppResult<Vec<ElementBoundary>> {
    let visibility = visibility_of(pool, user_domain, user_email, "getChildren").await?;
    ElementRepo::find(pool, &parent.domain, parent.id)
        .await?
        .ok_or_else(|| not_found(parent))?;
    let rows = ElementRepo::children(
        pool,
        &parent.domain,
        parent.id,
        visibility.only_active(),
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(into_boundaries(rows))
}

/// The child's single parent, as a zero-or-one element collection. Players
/// see the parent only while it is active.
pub async fn get_parent(
    pool: &DbPool,
    user_domain: &str,
    user_email: &str,
    child: &ElementId,
    page: PageRequest,
) -> AppResult<Vec<ElementBoundary>> {
    let visibility = visibility_of(pool, user_domain, user_email, "getParent").await?;
    ElementRepo::find(pool, &child.domain, child.id)
        .await?
        .ok_or_else(|| not_found(child))?;

    // A single parent fits on any valid page past the first only as empty.
    if page.page > 0 {
        return Ok(Vec::new());
    }

    let parent = ElementRepo::parent_of(pool, &child.domain, child.id).await?;
    Ok(parent
        .into_iter()
        .filter(|row| row.active || !visibility.only_active())
        .map(ElementBoundary::from)
        .collect())
}

/// Admin-only: delete every element.
pub async fn delete_all_elements(
    pool: &DbPool,
    admin_domain: &str,
    admin_email: &str,
) -> AppResult<u64> {
    users::require_role(pool, admin_domain, admin_email, Role::Admin, "deleteAllElements").await?;
    let deleted = ElementRepo::delete_all(pool).await?;
    tracing::info!(deleted, admin = %format!("{admin_domain}/{admin_email}"), "All elements deleted");
    Ok(deleted)
}

fn into_boundaries(rows: Vec<ElementRow>) -> Vec<ElementBoundary> {
    rows.into_iter().map(ElementBoundary::from).collect()
}

fn not_found(element: &ElementId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Element",
        id: format!("{}/{}", element.domain, element.id),
    })
}
