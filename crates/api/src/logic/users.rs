//! User service: registration, login, updates, role checks, and the
//! admin-only listing and bulk wipe.

use feedgrid_core::error::CoreError;
use feedgrid_core::pagination::PageRequest;
use feedgrid_core::roles::Role;
use feedgrid_db::models::user::{NewUser, UpdateUser, UserBoundary};
use feedgrid_db::repositories::UserRepo;
use feedgrid_db::DbPool;
use sqlx::PgExecutor;
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};

/// Resolve a user's role, if the user exists at all.
pub async fn role_of(
    executor: impl PgExecutor<'_>,
    domain: &str,
    email: &str,
) -> AppResult<Option<Role>> {
    let stored = UserRepo::role_of(executor, domain, email).await?;
    Ok(stored.as_deref().and_then(Role::parse))
}

/// Require that `(domain, email)` holds exactly `role`, else `RoleMismatch`.
pub async fn require_role(
    executor: impl PgExecutor<'_>,
    domain: &str,
    email: &str,
    role: Role,
    operation: &'static str,
) -> AppResult<()> {
    if role_of(executor, domain, email).await? == Some(role) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::RoleMismatch {
            user: format!("{domain}/{email}"),
            operation,
        }))
    }
}

/// Self-registration. The identity domain is always the server's own;
/// re-registering an existing `(domain, email)` is a conflict.
pub async fn create_user(
    pool: &DbPool,
    app_domain: &str,
    input: NewUser,
) -> AppResult<UserBoundary> {
    if !input.email.validate_email() {
        return Err(AppError::BadRequest(format!(
            "'{}' is not a valid email address",
            input.email
        )));
    }

    if UserRepo::find(pool, app_domain, &input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "user {app_domain}/{} is already registered",
            input.email
        ))));
    }

    let row = UserRepo::create(pool, app_domain, &input).await?;
    tracing::info!(domain = %row.domain, email = %row.email, role = %row.role, "User created");
    Ok(row.into())
}

/// Login is a plain lookup; unknown identities are `NotFound`.
pub async fn login(pool: &DbPool, domain: &str, email: &str) -> AppResult<UserBoundary> {
    UserRepo::find(pool, domain, email)
        .await?
        .map(UserBoundary::from)
        .ok_or_else(|| not_found(domain, email))
}

/// Partial update; absent fields (role included) keep their stored values.
pub async fn update_user(
    pool: &DbPool,
    domain: &str,
    email: &str,
    input: UpdateUser,
) -> AppResult<UserBoundary> {
    let row = UserRepo::update(pool, domain, email, &input)
        .await?
        .ok_or_else(|| not_found(domain, email))?;
    tracing::info!(domain = %row.domain, email = %row.email, "User updated");
    Ok(row.into())
}

/// Admin-only: list all users, optionally one page at a time.
pub async fn list_users(
    pool: &DbPool,
    admin_domain: &str,
    admin_email: &str,
    page: Option<PageRequest>,
) -> AppResult<Vec<UserBoundary>> {
    require_role(pool, admin_domain, admin_email, Role::Admin, "listUsers").await?;
    let rows = match page {
        Some(page) => UserRepo::list_page(pool, page.limit(), page.offset()).await?,
        None => UserRepo::list_all(pool).await?,
    };
    Ok(rows.into_iter().map(UserBoundary::from).collect())
}

/// Admin-only: delete every user.
pub async fn delete_all_users(pool: &DbPool, admin_domain: &str, admin_email: &str) -> AppResult<u64> {
    require_role(pool, admin_domain, admin_email, Role::Admin, "deleteAllUsers").await?;
    let deleted = UserRepo::delete_all(pool).await?;
    tracing::info!(deleted, admin = %format!("{admin_domain}/{admin_email}"), "All users deleted");
    Ok(deleted)
}

fn not_found(domain: &str, email: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "User",
        id: format!("{domain}/{email}"),
    })
}
