//! User endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::{
    ApiResponse, CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest, PageMeta,
    UpdateUserRequest, UserResponse,
};
use crate::config::PaginationConfig;
use crate::error::{AppError, AppResult, ErrorKind};
use crate::services::UserService;

const EMPTY_NAMES: &str = "First name and last name must not be empty";
const FIRST_NAME_REQUIRED: &str = "first name is required";
const LAST_NAME_REQUIRED: &str = "last name is required";

/// Every request the user endpoints accept.
#[derive(Debug, Clone)]
pub enum UserRequest {
    Create(CreateUserRequest),
    Get(GetUserRequest),
    GetAll(ListUsersRequest),
    Update(UpdateUserRequest),
    Delete(DeleteUserRequest),
}

/// Reply to a [`UserRequest`], one variant per operation.
#[derive(Debug)]
pub enum UserReply {
    Created(ApiResponse<UserResponse>),
    Found(ApiResponse<UserResponse>),
    Listed(ApiResponse<Vec<UserResponse>>),
    Updated(ApiResponse<()>),
    Deleted(ApiResponse<()>),
}

impl IntoResponse for UserReply {
    fn into_response(self) -> Response {
        match self {
            UserReply::Created(reply) | UserReply::Found(reply) => reply.into_response(),
            UserReply::Listed(reply) => reply.into_response(),
            UserReply::Updated(reply) | UserReply::Deleted(reply) => reply.into_response(),
        }
    }
}

#[derive(Clone)]
pub struct UserEndpoints {
    service: UserService,
    pagination: PaginationConfig,
}

impl UserEndpoints {
    pub fn new(service: UserService, pagination: PaginationConfig) -> Self {
        Self {
            service,
            pagination,
        }
    }

    pub fn service(&self) -> &UserService {
        &self.service
    }

    /// Dispatch a request to its operation.
    pub async fn handle(&self, request: UserRequest) -> AppResult<UserReply> {
        match request {
            UserRequest::Create(req) => self.create(req).await.map(UserReply::Created),
            UserRequest::Get(req) => self.get(req).await.map(UserReply::Found),
            UserRequest::GetAll(req) => self.get_all(req).await.map(UserReply::Listed),
            UserRequest::Update(req) => self.update(req).await.map(UserReply::Updated),
            UserRequest::Delete(req) => self.delete(req).await.map(UserReply::Deleted),
        }
    }

    pub async fn create(&self, req: CreateUserRequest) -> AppResult<ApiResponse<UserResponse>> {
        if req.first_name.is_empty() || req.last_name.is_empty() {
            return Err(AppError::bad_request(EMPTY_NAMES));
        }
        req.validate()?;

        let user = self
            .service
            .create_user(req.first_name, req.last_name, req.email, req.phone)
            .await?;

        Ok(ApiResponse::new(StatusCode::CREATED, "success").with_data(UserResponse::from(user)))
    }

    pub async fn get(&self, req: GetUserRequest) -> AppResult<ApiResponse<UserResponse>> {
        let id = parse_id(&req.id)?;
        let user = self.service.get_user(id).await?;

        Ok(ApiResponse::new(StatusCode::OK, "success").with_data(UserResponse::from(user)))
    }

    /// Count, derive the page, then fetch it with the same filters.
    pub async fn get_all(&self, req: ListUsersRequest) -> AppResult<ApiResponse<Vec<UserResponse>>> {
        let total = self
            .service
            .count_users(&req.filters)
            .await
            .map_err(not_found_or_internal)?;

        let meta = PageMeta::new(req.page, req.limit, total, &self.pagination);

        let users = self
            .service
            .get_all_users(&req.filters, meta.offset(), meta.limit())
            .await
            .map_err(not_found_or_internal)?;

        let data = users.into_iter().map(UserResponse::from).collect();
        Ok(ApiResponse::new(StatusCode::OK, "success")
            .with_data(data)
            .with_meta(meta))
    }

    pub async fn update(&self, req: UpdateUserRequest) -> AppResult<ApiResponse<()>> {
        if req.first_name.as_deref() == Some("") {
            return Err(AppError::bad_request(FIRST_NAME_REQUIRED));
        }
        if req.last_name.as_deref() == Some("") {
            return Err(AppError::bad_request(LAST_NAME_REQUIRED));
        }
        req.validate()?;

        let id = parse_id(&req.id)?;
        self.service.update_user(id, req.into_update_user()).await?;

        Ok(ApiResponse::new(StatusCode::CREATED, "updated"))
    }

    pub async fn delete(&self, req: DeleteUserRequest) -> AppResult<ApiResponse<()>> {
        let id = parse_id(&req.id)?;
        self.service.delete_user(id).await?;

        Ok(ApiResponse::new(StatusCode::OK, "deleted"))
    }
}

/// Ids that are not UUIDs cannot name a stored user.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::user_not_found(raw))
}

/// Listing reports only not-found or internal failures.
fn not_found_or_internal(error: AppError) -> AppError {
    match error.kind() {
        ErrorKind::NotFound | ErrorKind::Internal => error,
        ErrorKind::BadRequest => AppError::Internal {
            source: anyhow::Error::from(error),
        },
    }
}
