//! User CRUD request handlers.
//!
//! Handlers only decode HTTP input into a [`UserRequest`] and hand it to the
//! user endpoints; the reply is already a complete response.

use axum::extract::{Path, State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::{
    ApiResponse, CreateUserRequest, DeleteUserRequest, ErrorResponse, GetUserRequest,
    ListUsersQuery, MessageResponse, UpdateUserRequest, UserResponse,
};
use crate::api::endpoints::{UserReply, UserRequest};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::error::AppResult;
use crate::state::AppState;

/// Creates user-related routes.
///
/// Routes:
/// - GET /users          - List users with filters and pagination
/// - POST /users         - Create a new user
/// - GET /users/{id}     - Get user by ID
/// - PATCH /users/{id}   - Partially update user by ID
/// - DELETE /users/{id}  - Delete user by ID
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users, create_user))
        .routes(routes!(get_user, update_user, delete_user))
}

/// POST /users - Create new user
#[utoipa::path(
    post,
    path = "/users",
    tag = USER_TAG,
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Empty names, oversized fields or malformed JSON", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> AppResult<UserReply> {
    state.users.handle(UserRequest::Create(payload)).await
}

/// GET /users/{id} - Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = USER_TAG,
    params(("id" = String, Path, description = "User id (UUID)")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResponse>),
        (status = 404, description = "User does not exist", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<UserReply> {
    state.users.handle(UserRequest::Get(GetUserRequest { id })).await
}

/// GET /users - List users
///
/// Returns one page of users matching the name filters, with page metadata.
#[utoipa::path(
    get,
    path = "/users",
    tag = USER_TAG,
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users", body = ApiResponse<Vec<UserResponse>>),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> AppResult<UserReply> {
    state
        .users
        .handle(UserRequest::GetAll(query.into_request()))
        .await
}

/// PATCH /users/{id} - Update user
///
/// Only supplied fields change.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = USER_TAG,
    params(("id" = String, Path, description = "User id (UUID)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 201, description = "User updated", body = MessageResponse),
        (status = 400, description = "Explicitly empty name or malformed JSON", body = ErrorResponse),
        (status = 404, description = "User does not exist", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(mut payload): ApiJson<UpdateUserRequest>,
) -> AppResult<UserReply> {
    payload.id = id;
    state.users.handle(UserRequest::Update(payload)).await
}

/// DELETE /users/{id} - Delete user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = USER_TAG,
    params(("id" = String, Path, description = "User id (UUID)")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User does not exist", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<UserReply> {
    state
        .users
        .handle(UserRequest::Delete(DeleteUserRequest { id }))
        .await
}
