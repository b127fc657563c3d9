//! Repository for the `elements` table.
//!
//! Listing methods take an `only_active` flag: managers list everything,
//! players only active rows. All listings are ordered ascending by
//! (domain, id).

use feedgrid_core::transition::BowlKind;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::element::{ElementPatch, ElementRow, InsertElement};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    domain, id, element_type, name, active, lat, lng, \
    created_by_domain, created_by_email, created_at, attributes, \
    parent_domain, parent_id, full_food_bowls, full_water_bowls";

/// Shared ordering clause: ascending by (domain, id).
const ORDERING: &str = "ORDER BY domain ASC, id ASC";

/// Counter column for a bowl kind.
fn counter_column(kind: BowlKind) -> &'static str {
    match kind {
        BowlKind::Food => "full_food_bowls",
        BowlKind::Water => "full_water_bowls",
    }
}

/// Extra predicate for player-visible listings.
fn active_clause(only_active: bool) -> &'static str {
    if only_active {
        " AND active = TRUE"
    } else {
        ""
    }
}

/// Provides CRUD, search, and hierarchy operations for elements.
pub struct ElementRepo;

impl ElementRepo {
    /// Insert a fully-resolved element, returning the created row.
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        input: &InsertElement,
    ) -> Result<ElementRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO elements (
                domain, id, element_type, name, active, lat, lng,
                created_by_domain, created_by_email, attributes,
                parent_domain, parent_id, full_food_bowls, full_water_bowls)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ElementRow>(&query)
            .bind(&input.domain)
            .bind(input.id)
            .bind(&input.element_type)
            .bind(&input.name)
            .bind(input.active)
            .bind(input.lat)
            .bind(input.lng)
            .bind(&input.created_by_domain)
            .bind(&input.created_by_email)
            .bind(serde_json::Value::Object(input.attributes.clone()))
            .bind(&input.parent_domain)
            .bind(input.parent_id)
            .bind(input.full_food_bowls)
            .bind(input.full_water_bowls)
            .fetch_one(executor)
            .await
    }

    /// Find an element by identity.
    pub async fn find(
        executor: impl PgExecutor<'_>,
        domain: &str,
        id: Uuid,
    ) -> Result<Option<ElementRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM elements WHERE domain = $1 AND id = $2");
        sqlx::query_as::<_, ElementRow>(&query)
            .bind(domain)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Apply a partial patch. Only non-`None` fields overwrite; `None`
    /// fields are no-ops. Returns `None` for an unknown identity.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        domain: &str,
        id: Uuid,
        patch: &ElementPatch,
    ) -> Result<Option<ElementRow>, sqlx::Error> {
        let query = format!(
            "UPDATE elements SET
                element_type = COALESCE($3, element_type),
                name = COALESCE($4, name),
                active = COALESCE($5, active),
                lat = COALESCE($6, lat),
                lng = COALESCE($7, lng),
                attributes = COALESCE($8, attributes)
             WHERE domain = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ElementRow>(&query)
            .bind(domain)
            .bind(id)
            .bind(&patch.element_type)
            .bind(&patch.name)
            .bind(patch.active)
            .bind(patch.location.map(|l| l.lat))
            .bind(patch.location.map(|l| l.lng))
            .bind(
                patch
                    .element_attributes
                    .clone()
                    .map(serde_json::Value::Object),
            )
            .fetch_optional(executor)
            .await
    }

    /// Soft-(de)activate an element. Returns `None` for an unknown identity.
    pub async fn set_active(
        executor: impl PgExecutor<'_>,
        domain: &str,
        id: Uuid,
        active: bool,
    ) -> Result<Option<ElementRow>, sqlx::Error> {
        let query = format!(
            "UPDATE elements SET active = $3 WHERE domain = $1 AND id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ElementRow>(&query)
            .bind(domain)
            .bind(id)
            .bind(active)
            .fetch_optional(executor)
            .await
    }

    /// List one page of elements.
    pub async fn list(
        pool: &PgPool,
        only_active: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ElementRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM elements WHERE TRUE{} {ORDERING} LIMIT $1 OFFSET $2",
            active_clause(only_active)
        );
        sqlx::query_as::<_, ElementRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List one page of elements matching a name pattern (SQL LIKE).
    pub async fn list_by_name(
        pool: &PgPool,
        name: &str,
        only_active: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ElementRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM elements WHERE name LIKE $1{} {ORDERING} LIMIT $2 OFFSET $3",
            active_clause(only_active)
        );
        sqlx::query_as::<_, ElementRow>(&query)
            .bind(name)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List one page of elements matching a type pattern (SQL LIKE).
    pub async fn list_by_type(
        pool: &PgPool,
        element_type: &str,
        only_active: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ElementRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM elements WHERE element_type LIKE $1{} {ORDERING} \
             LIMIT $2 OFFSET $3",
            active_clause(only_active)
        );
        sqlx::query_as::<_, ElementRow>(&query)
            .bind(element_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List one page of elements inside the bounding box centered on
    /// (lat, lng) with half-width `distance` in degrees.
    pub async fn list_nearby(
        pool: &PgPool,
        lat: f64,
        lng: f64,
        distance: f64,
        only_active: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ElementRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM elements \
             WHERE lat BETWEEN $1 AND $2 AND lng BETWEEN $3 AND $4{} {ORDERING} \
             LIMIT $5 OFFSET $6",
            active_clause(only_active)
        );
        sqlx::query_as::<_, ElementRow>(&query)
            .bind(lat - distance)
            .bind(lat + distance)
            .bind(lng - distance)
            .bind(lng + distance)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Bounding-box search narrowed by a type pattern.
    pub async fn list_by_type_nearby(
        pool: &PgPool,
        lat: f64,
        lng: f64,
        distance: f64,
        element_type: &str,
        only_active: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ElementRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM elements \
             WHERE lat BETWEEN $1 AND $2 AND lng BETWEEN $3 AND $4 \
             AND element_type LIKE $5{} {ORDERING} LIMIT $6 OFFSET $7",
            active_clause(only_active)
        );
        sqlx::query_as::<_, ElementRow>(&query)
            .bind(lat - distance)
            .bind(lat + distance)
            .bind(lng - distance)
            .bind(lng + distance)
            .bind(element_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Point a child's parent reference at the given parent. Idempotent:
    /// re-binding the same pair rewrites the same value.
    ///
    /// Returns `false` if the child identity is unknown.
    pub async fn set_parent(
        executor: impl PgExecutor<'_>,
        child_domain: &str,
        child_id: Uuid,
        parent_domain: &str,
        parent_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE elements SET parent_domain = $3, parent_id = $4 \
             WHERE domain = $1 AND id = $2",
        )
        .bind(child_domain)
        .bind(child_id)
        .bind(parent_domain)
        .bind(parent_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List one page of an element's direct children.
    pub async fn children(
        executor: impl PgExecutor<'_>,
        parent_domain: &str,
        parent_id: Uuid,
        only_active: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ElementRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM elements \
             WHERE parent_domain = $1 AND parent_id = $2{} {ORDERING} LIMIT $3 OFFSET $4",
            active_clause(only_active)
        );
        sqlx::query_as::<_, ElementRow>(&query)
            .bind(parent_domain)
            .bind(parent_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Resolve a child's parent element, if the child has one.
    pub async fn parent_of(
        executor: impl PgExecutor<'_>,
        child_domain: &str,
        child_id: Uuid,
    ) -> Result<Option<ElementRow>, sqlx::Error> {
        let query = "SELECT p.domain, p.id, p.element_type, p.name, p.active, p.lat, p.lng, \
                    p.created_by_domain, p.created_by_email, p.created_at, p.attributes, \
                    p.parent_domain, p.parent_id, p.full_food_bowls, p.full_water_bowls \
             FROM elements c \
             JOIN elements p ON p.domain = c.parent_domain AND p.id = c.parent_id \
             WHERE c.domain = $1 AND c.id = $2";
        sqlx::query_as::<_, ElementRow>(query)
            .bind(child_domain)
            .bind(child_id)
            .fetch_optional(executor)
            .await
    }

    /// Adjust a feeding-area counter by `delta` in a single statement,
    /// floored at zero. Row-level atomicity makes concurrent adjustments
    /// safe without an explicit lock.
    pub async fn adjust_counter(
        executor: impl PgExecutor<'_>,
        domain: &str,
        id: Uuid,
        kind: BowlKind,
        delta: i64,
    ) -> Result<Option<ElementRow>, sqlx::Error> {
        let column = counter_column(kind);
        let query = format!(
            "UPDATE elements SET {column} = GREATEST({column} + $3, 0) \
             WHERE domain = $1 AND id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ElementRow>(&query)
            .bind(domain)
            .bind(id)
            .bind(delta)
            .fetch_optional(executor)
            .await
    }

    /// Delete every element. Admin bulk wipe only.
    pub async fn delete_all(executor: impl PgExecutor<'_>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM elements").execute(executor).await?;
        Ok(result.rows_affected())
    }
}
