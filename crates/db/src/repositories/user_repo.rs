//! Repository for the `users` table.

use sqlx::{PgExecutor, PgPool};

use crate::models::user::{NewUser, UpdateUser, UserRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "domain, email, username, role, avatar, created_at";

/// Provides CRUD and role-lookup operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user under the given domain, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        domain: &str,
        input: &NewUser,
    ) -> Result<UserRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (domain, email, username, role, avatar)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(domain)
            .bind(&input.email)
            .bind(&input.username)
            .bind(input.role.as_str())
            .bind(&input.avatar)
            .fetch_one(executor)
            .await
    }

    /// Find a user by identity.
    pub async fn find(
        executor: impl PgExecutor<'_>,
        domain: &str,
        email: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE domain = $1 AND email = $2");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(domain)
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// Resolve a user's stored role name, if the user exists.
    pub async fn role_of(
        executor: impl PgExecutor<'_>,
        domain: &str,
        email: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE domain = $1 AND email = $2")
            .bind(domain)
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied; an
    /// absent role keeps the stored one.
    ///
    /// Returns `None` if the identity is unknown.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        domain: &str,
        email: &str,
        input: &UpdateUser,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($3, username),
                role = COALESCE($4, role),
                avatar = COALESCE($5, avatar)
             WHERE domain = $1 AND email = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(domain)
            .bind(email)
            .bind(&input.username)
            .bind(input.role.map(|r| r.as_str()))
            .bind(&input.avatar)
            .fetch_optional(executor)
            .await
    }

    /// List all users ordered ascending by (domain, email).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY domain ASC, email ASC");
        sqlx::query_as::<_, UserRow>(&query).fetch_all(pool).await
    }

    /// List one page of users, same ordering as [`Self::list_all`].
    pub async fn list_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users ORDER BY domain ASC, email ASC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete every user. Admin bulk wipe only.
    pub async fn delete_all(executor: impl PgExecutor<'_>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users").execute(executor).await?;
        Ok(result.rows_affected())
    }
}
