//! Role-gated service layer.
//!
//! Handlers stay thin; the semantics (role checks, visibility filtering,
//! the action-processor state machine) live here, on top of the
//! repositories in `feedgrid_db`.

pub mod actions;
pub mod elements;
pub mod users;
