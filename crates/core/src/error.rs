//! Domain error taxonomy.
//!
//! Every service operation either fully succeeds or fails with exactly one
//! of these variants. The API crate maps them onto HTTP status codes.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The acting user does not hold the role an operation requires.
    #[error("Role mismatch: {user} may not perform {operation}")]
    RoleMismatch { user: String, operation: &'static str },

    /// A referenced user, element, or action does not exist (or is not
    /// visible to the acting role).
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Duplicate identity on create, or a caller-supplied identity where
    /// the server assigns one.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Pagination parameters out of range (`size <= 0` or `page < 0`).
    #[error("Invalid pagination: size {size}, page {page}")]
    InvalidPagination { size: i64, page: i64 },

    /// Action type unrecognized, or its attributes do not match the
    /// payload schema the type requires.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Reserved: an operation targeted a deactivated element. No current
    /// path raises this; inactive targets surface as `NotFound` to players.
    #[error("Element is inactive: {id}")]
    InactiveElement { id: String },

    #[error("Internal error: {0}")]
    Internal(String),
}
