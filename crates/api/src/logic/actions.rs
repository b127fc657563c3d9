//! The action processor: validates an invocation against the invoker's
//! role, dispatches on the action kind, mutates the element store, and
//! appends the accepted action to the log.
//!
//! Every dispatch arm runs inside one transaction together with the log
//! append: either the whole invocation commits (element mutation, counter
//! adjustment, cascade, log entry) or none of it does.

use feedgrid_core::action::{
    bowl_state, residual_attributes, ActionKind, ActionPayload, Attributes, RoutingFields,
};
use feedgrid_core::error::CoreError;
use feedgrid_core::pagination::PageRequest;
use feedgrid_core::roles::Role;
use feedgrid_core::transition::{bowl_delta, BowlKind, BowlTransition};
use feedgrid_core::types::TYPE_FEEDING_AREA;
use feedgrid_db::models::action::{ActionBoundary, InvokeAction};
use feedgrid_db::models::element::{ElementId, ElementPatch, ElementRow, InsertElement};
use feedgrid_db::repositories::action_repo::AppendAction;
use feedgrid_db::repositories::{ActionRepo, ElementRepo};
use feedgrid_db::DbPool;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::logic::users;

/// Children are deactivated in fixed-size pages during a cascade.
const CASCADE_PAGE_SIZE: i64 = 20;

/// Invoke an action on behalf of a player.
pub async fn invoke_action(
    pool: &DbPool,
    app_domain: &str,
    input: InvokeAction,
) -> AppResult<ActionBoundary> {
    if let Some(id) = &input.action_id {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "action identity {}/{} must be server-assigned",
            id.domain, id.id
        ))));
    }

    let invoker = &input.invoked_by.user_id;
    users::require_role(pool, &invoker.domain, &invoker.email, Role::Player, "invokeAction")
        .await?;

    let kind = ActionKind::parse(&input.action_type)?;
    let payload = kind.payload(&input.action_attributes)?;

    let mut tx = pool.begin().await?;

    let target = fetch_target(&mut tx, &input.element.element_id).await?;
    match kind {
        ActionKind::AddFoodBowl
        | ActionKind::AddWaterBowl
        | ActionKind::AddFeedingArea => {
            add_element(&mut tx, app_domain, kind, &payload, &input.action_attributes, &target)
                .await?;
        }
        ActionKind::RefillFoodBowl | ActionKind::RefillWaterBowl => {
            refill_bowl(&mut tx, kind, &payload, &input.action_attributes, &target).await?;
        }
        ActionKind::RemoveFoodBowl | ActionKind::RemoveWaterBowl => {
            remove_bowl(&mut tx, kind, &input.action_attributes, &target).await?;
        }
        ActionKind::RemoveFeedingArea => {
            remove_feeding_area(&mut tx, &input.action_attributes, &target).await?;
        }
    }

    let append = AppendAction {
        domain: app_domain.to_string(),
        id: Uuid::new_v4(),
        action_type: kind.as_str().to_string(),
        element_domain: input.element.element_id.domain.clone(),
        element_id: input.element.element_id.id,
        invoked_by_domain: invoker.domain.clone(),
        invoked_by_email: invoker.email.clone(),
        attributes: input.action_attributes.clone(),
    };
    let recorded = ActionRepo::append(&mut *tx, &append).await?;

    tx.commit().await?;

    tracing::info!(
        action = %recorded.action_type,
        id = %recorded.id,
        invoker = %format!("{}/{}", recorded.invoked_by_domain, recorded.invoked_by_email),
        "Action accepted"
    );
    Ok(recorded.into())
}

/// Fetch the action's target element. Players never see inactive
/// elements, so an inactive target reads as not found.
async fn fetch_target(
    tx: &mut Transaction<'_, Postgres>,
    element: &ElementId,
) -> AppResult<ElementRow> {
    let row = ElementRepo::find(&mut **tx, &element.domain, element.id)
        .await?
        .filter(|row| row.active)
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Element",
                id: format!("{}/{}", element.domain, element.id),
            })
        })?;
    Ok(row)
}

/// Require the manager identity carried in the action attributes to
/// actually hold the manager role.
async fn require_manager(
    tx: &mut Transaction<'_, Postgres>,
    domain: &str,
    email: &str,
    operation: &'static str,
) -> AppResult<()> {
    users::require_role(&mut **tx, domain, email, Role::Manager, operation).await
}

/// `add-*`: create a child element under the target on behalf of the
/// manager named in the attributes, and credit an initially full bowl to
/// the target's counter.
async fn add_element(
    tx: &mut Transaction<'_, Postgres>,
    app_domain: &str,
    kind: ActionKind,
    payload: &ActionPayload,
    attributes: &Attributes,
    target: &ElementRow,
) -> AppResult<()> {
    let routing = RoutingFields::from_attributes(attributes)?;
    require_manager(tx, &routing.manager_domain, &routing.manager_email, "addElement").await?;

    let mut residual = residual_attributes(attributes);
    let (element_type, food, water) = match payload {
        ActionPayload::FeedingArea(spec) => {
            // Counters move into their typed columns.
            residual.remove("fullFoodBowl");
            residual.remove("fullWaterBowl");
            (TYPE_FEEDING_AREA, spec.full_food_bowl.max(0), spec.full_water_bowl.max(0))
        }
        _ => (
            kind.bowl_kind()
                .expect("bowl payload implies bowl kind")
                .element_type(),
            0,
            0,
        ),
    };

    let insert = InsertElement {
        domain: app_domain.to_string(),
        id: Uuid::new_v4(),
        element_type: element_type.to_string(),
        name: routing.element_name,
        active: true,
        lat: routing.lat,
        lng: routing.lng,
        created_by_domain: routing.manager_domain,
        created_by_email: routing.manager_email,
        attributes: residual,
        parent_domain: Some(target.domain.clone()),
        parent_id: Some(target.id),
        full_food_bowls: food,
        full_water_bowls: water,
    };
    let created = ElementRepo::insert(&mut **tx, &insert).await?;
    tracing::debug!(id = %created.id, element_type = %created.element_type, "Action created element");

    if let (Some(full), Some(bowl)) = (payload.bowl_is_full(), kind.bowl_kind()) {
        adjust_area_counter(tx, &target.domain, target.id, bowl, bowl_delta(BowlTransition::Created { full }))
            .await?;
    }
    Ok(())
}

/// `refill-*`: replace the bowl's attributes and settle the parent's
/// counter when the full/empty state flipped.
async fn refill_bowl(
    tx: &mut Transaction<'_, Postgres>,
    kind: ActionKind,
    payload: &ActionPayload,
    attributes: &Attributes,
    target: &ElementRow,
) -> AppResult<()> {
    let (manager_domain, manager_email) = RoutingFields::manager_identity(attributes)?;
    require_manager(tx, &manager_domain, &manager_email, "refillBowl").await?;

    let was_full = bowl_state(&target.attribute_map());
    let now_full = payload.bowl_is_full().unwrap_or(false);

    let patch = ElementPatch {
        element_attributes: Some(residual_attributes(attributes)),
        ..Default::default()
    };
    ElementRepo::update(&mut **tx, &target.domain, target.id, &patch).await?;

    let delta = bowl_delta(BowlTransition::Refilled { was_full, now_full });
    if delta != 0 {
        if let Some(parent) = ElementRepo::parent_of(&mut **tx, &target.domain, target.id).await? {
            let bowl = kind.bowl_kind().expect("refill kind implies bowl kind");
            adjust_area_counter(tx, &parent.domain, parent.id, bowl, delta).await?;
        }
    }
    Ok(())
}

/// `remove-food_bowl` / `remove-water_bowl`: soft-deactivate the bowl and
/// take back a full bowl's counter contribution.
async fn remove_bowl(
    tx: &mut Transaction<'_, Postgres>,
    kind: ActionKind,
    attributes: &Attributes,
    target: &ElementRow,
) -> AppResult<()> {
    let (manager_domain, manager_email) = RoutingFields::manager_identity(attributes)?;
    require_manager(tx, &manager_domain, &manager_email, "removeBowl").await?;

    let was_full = bowl_state(&target.attribute_map());
    ElementRepo::set_active(&mut **tx, &target.domain, target.id, false).await?;

    let delta = bowl_delta(BowlTransition::Removed { was_full });
    if delta != 0 {
        if let Some(parent) = ElementRepo::parent_of(&mut **tx, &target.domain, target.id).await? {
            let bowl = kind.bowl_kind().expect("remove kind implies bowl kind");
            adjust_area_counter(tx, &parent.domain, parent.id, bowl, delta).await?;
        }
    }
    Ok(())
}

/// `remove-feeding_area`: soft-deactivate the area and cascade over its
/// active children one page at a time. Inactive children are untouched,
/// which also makes a repeated cascade a no-op.
async fn remove_feeding_area(
    tx: &mut Transaction<'_, Postgres>,
    attributes: &Attributes,
    target: &ElementRow,
) -> AppResult<()> {
    let (manager_domain, manager_email) = RoutingFields::manager_identity(attributes)?;
    require_manager(tx, &manager_domain, &manager_email, "removeFeedingArea").await?;

    ElementRepo::set_active(&mut **tx, &target.domain, target.id, false).await?;

    loop {
        let children = ElementRepo::children(
            &mut **tx,
            &target.domain,
            target.id,
            true,
            CASCADE_PAGE_SIZE,
            0,
        )
        .await?;
        if children.is_empty() {
            break;
        }
        for child in &children {
            ElementRepo::set_active(&mut **tx, &child.domain, child.id, false).await?;
        }
    }
    tracing::debug!(id = %target.id, "Feeding area deactivated with cascade");
    Ok(())
}

/// Single-statement, clamped counter adjustment on a feeding area.
async fn adjust_area_counter(
    tx: &mut Transaction<'_, Postgres>,
    domain: &str,
    id: Uuid,
    kind: BowlKind,
    delta: i64,
) -> AppResult<()> {
    if delta == 0 {
        return Ok(());
    }
    ElementRepo::adjust_counter(&mut **tx, domain, id, kind, delta).await?;
    Ok(())
}

/// Admin-only: read the action log, optionally one page at a time.
pub async fn list_actions(
    pool: &DbPool,
    admin_domain: &str,
    admin_email: &str,
    page: Option<PageRequest>,
) -> AppResult<Vec<ActionBoundary>> {
    users::require_role(pool, admin_domain, admin_email, Role::Admin, "listActions").await?;
    let rows = match page {
        Some(page) => ActionRepo::list_page(pool, page.limit(), page.offset()).await?,
        None => ActionRepo::list_all(pool).await?,
    };
    Ok(rows.into_iter().map(ActionBoundary::from).collect())
}

/// Admin-only: wipe the action log.
pub async fn delete_all_actions(
    pool: &DbPool,
    admin_domain: &str,
    admin_email: &str,
) -> AppResult<u64> {
    users::require_role(pool, admin_domain, admin_email, Role::Admin, "deleteAllActions").await?;
    let deleted = ActionRepo::delete_all(pool).await?;
    tracing::info!(deleted, admin = %format!("{admin_domain}/{admin_email}"), "Action log wiped");
    Ok(deleted)
}
