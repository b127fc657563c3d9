//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Read-side methods take `&PgPool`; mutating methods take any
//! `PgExecutor` so the action processor can run a whole dispatch inside a
//! single transaction.

pub mod action_repo;
pub mod element_repo;
pub mod user_repo;

pub use action_repo::ActionRepo;
pub use element_repo::ElementRepo;
pub use user_repo::UserRepo;
