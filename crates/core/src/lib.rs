//! Pure domain logic for the FeedGrid backend.
//!
//! No I/O lives here: role definitions, the error taxonomy, pagination
//! validation, the action-kind tagged union with its payload validators,
//! and the bowl state-transition function. The `db` and `api` crates build
//! on these types.

pub mod action;
pub mod datetime;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod transition;
pub mod types;
