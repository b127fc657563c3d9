//! User entity model and DTOs.

use feedgrid_core::roles::Role;
use feedgrid_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub domain: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub avatar: String,
    pub created_at: Timestamp,
}

/// A user's composite identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId {
    pub domain: String,
    pub email: String,
}

/// Wire shape: `{userId: {domain, email}, role, username, avatar}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBoundary {
    pub user_id: UserId,
    pub role: Role,
    pub username: String,
    pub avatar: String,
}

impl From<UserRow> for UserBoundary {
    fn from(row: UserRow) -> Self {
        // Stored roles come from the closed set; an out-of-set value means
        // the table was edited behind the application's back.
        let role = Role::parse(&row.role).unwrap_or(Role::Player);
        UserBoundary {
            user_id: UserId {
                domain: row.domain,
                email: row.email,
            },
            role,
            username: row.username,
            avatar: row.avatar,
        }
    }
}

/// DTO for self-registration. The domain is assigned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub role: Role,
    pub username: String,
    pub avatar: String,
}

/// Partial user update; absent fields (role included) keep their stored
/// values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub role: Option<Role>,
    pub username: Option<String>,
    pub avatar: Option<String>,
}
