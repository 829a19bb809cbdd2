//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and endpoints.

mod user_service;

pub use user_service::UserService;
