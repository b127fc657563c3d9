//! Repository for the `actions` table (append-only log).

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use feedgrid_core::action::Attributes;
use crate::models::action::ActionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    domain, id, action_type, element_domain, element_id, \
    invoked_by_domain, invoked_by_email, attributes, created_at";

/// Values for an action log append.
#[derive(Debug, Clone)]
pub struct AppendAction {
    pub domain: String,
    pub id: Uuid,
    pub action_type: String,
    pub element_domain: String,
    pub element_id: Uuid,
    pub invoked_by_domain: String,
    pub invoked_by_email: String,
    pub attributes: Attributes,
}

/// Provides append and query operations for the action log. No update
/// path exists: log entries are immutable.
pub struct ActionRepo;

impl ActionRepo {
    /// Append one accepted action, returning the recorded row.
    pub async fn append(
        executor: impl PgExecutor<'_>,
        input: &AppendAction,
    ) -> Result<ActionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO actions (
                domain, id, action_type, element_domain, element_id,
                invoked_by_domain, invoked_by_email, attributes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActionRow>(&query)
            .bind(&input.domain)
            .bind(input.id)
            .bind(&input.action_type)
            .bind(&input.element_domain)
            .bind(input.element_id)
            .bind(&input.invoked_by_domain)
            .bind(&input.invoked_by_email)
            .bind(serde_json::Value::Object(input.attributes.clone()))
            .fetch_one(executor)
            .await
    }

    /// List the whole log ordered ascending by (domain, id).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ActionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actions ORDER BY domain ASC, id ASC");
        sqlx::query_as::<_, ActionRow>(&query).fetch_all(pool).await
    }

    /// List one page of the log, same ordering as [`Self::list_all`].
    pub async fn list_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM actions ORDER BY domain ASC, id ASC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ActionRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete the entire log. Admin bulk wipe only.
    pub async fn delete_all(executor: impl PgExecutor<'_>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM actions").execute(executor).await?;
        Ok(result.rows_affected())
    }
}
