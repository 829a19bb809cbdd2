//! Endpoint layer between HTTP handlers and services.
//!
//! Endpoints validate request shape, call the service and wrap results in
//! the response envelope. They know nothing about HTTP extraction.

mod users;

pub use users::{UserEndpoints, UserReply, UserRequest};
