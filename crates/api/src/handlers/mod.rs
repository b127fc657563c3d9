//! HTTP handlers, one module per resource. Handlers stay thin: extract,
//! delegate to [`crate::logic`], wrap in the `{data}` envelope.

pub mod actions;
pub mod admin;
pub mod elements;
pub mod users;
