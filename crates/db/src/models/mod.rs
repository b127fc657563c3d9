//! Row models and boundary (wire) DTOs.
//!
//! Each entity module holds the `FromRow` struct for its table, the
//! camelCase JSON boundary shape exchanged with clients, and the
//! create/patch DTOs the handlers accept.

pub mod action;
pub mod element;
pub mod user;
