//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `user` - User-related request/response DTOs
//! - `response` - Success envelope shared by every endpoint
//! - `error` - Error envelope
//! - `pagination` - Page metadata for listings

mod error;
mod pagination;
mod response;
mod user;

pub use error::ErrorResponse;
pub use pagination::PageMeta;
pub use response::{ApiResponse, MessageResponse};
pub use user::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersQuery, ListUsersRequest,
    UpdateUserRequest, UserResponse,
};
