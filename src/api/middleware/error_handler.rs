//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` renders into the error envelope with a status chosen by its
//! kind. The [`error_envelope_middleware`] rewrites error responses produced
//! outside the handlers (unknown routes, wrong methods, path rejections,
//! timeouts) into the same envelope.

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::{AppError, ErrorKind};

/// Upper bound on bodies read back when rewriting plain-text errors.
const MAX_ERROR_BODY: usize = 64 * 1024;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - NotFound → 404
    /// - BadRequest, Validation → 400
    /// - Database, Configuration, ConnectionPool, Internal → 500
    ///
    /// Internal errors are logged with their source chain; the body only
    /// carries a generic message.
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);

        let error_response = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found_error(entity, field, value),
            AppError::Validation { field, reason } => ErrorResponse::validation_error(field, reason),
            AppError::BadRequest { message } => {
                ErrorResponse::new(status, error_to_code(&self), message)
            }
            AppError::Database { operation, .. } => {
                tracing::error!(error = ?self, operation = %operation, "Database operation failed");
                ErrorResponse::new(status, error_to_code(&self), "A database error occurred")
                    .with_details(json!({ "operation": operation }))
            }
            AppError::Configuration { key, .. } => {
                tracing::error!(error = ?self, key = %key, "Configuration error");
                ErrorResponse::new(status, error_to_code(&self), "A configuration error occurred")
            }
            AppError::ConnectionPool { .. } => {
                tracing::error!(error = ?self, "Database connection unavailable");
                ErrorResponse::new(status, error_to_code(&self), "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                tracing::error!(error = ?self, "Internal error");
                ErrorResponse::new(status, error_to_code(&self), "An internal error occurred")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError to its HTTP status code through its kind.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error.kind() {
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Validation { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

/// Rewrites non-JSON 4xx/5xx responses into the error envelope.
pub async fn error_envelope_middleware(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let original_message = match axum::body::to_bytes(body, MAX_ERROR_BODY).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };

    let (code, default_message) = describe_status(status);
    let message = if original_message.is_empty() || status.is_server_error() {
        default_message.to_string()
    } else {
        original_message
    };

    let body = ErrorResponse::new(status, code, &message);
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_ENCODING);

    let mut rewritten = (status, Json(body)).into_response();
    for (name, value) in parts.headers.iter() {
        rewritten.headers_mut().entry(name).or_insert(value.clone());
    }
    rewritten
}

fn is_json(response: &Response<Body>) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

fn describe_status(status: StatusCode) -> (&'static str, &'static str) {
    match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request - invalid or malformed request"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => (
            "METHOD_NOT_ALLOWED",
            "HTTP method not allowed for this endpoint",
        ),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::SERVICE_UNAVAILABLE => ("SERVICE_UNAVAILABLE", "Service temporarily unavailable"),
        s if s.is_server_error() => ("INTERNAL_SERVER_ERROR", "An internal server error occurred"),
        _ => ("UNKNOWN_ERROR", "An unknown error occurred"),
    }
}
