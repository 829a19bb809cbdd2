//! User-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{UpdateUser, User, UserFilters};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a new user.
///
/// Missing names decode as empty strings so they are reported by the
/// endpoint's own empty-name check.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    #[schema(max_length = 50, example = "Ada")]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    #[schema(max_length = 50, example = "Lovelace")]
    pub last_name: String,

    #[validate(length(max = 50, message = "Email must be at most 50 characters"))]
    #[schema(max_length = 50, example = "ada@example.com")]
    pub email: Option<String>,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    #[schema(max_length = 30, example = "+44 20 7946 0000")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GetUserRequest {
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteUserRequest {
    pub id: String,
}

/// Request body for partially updating a user.
///
/// An absent field and an explicit `null` both leave the stored value alone.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    /// Taken from the path, never from the body
    #[serde(skip)]
    pub id: String,

    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    #[schema(max_length = 50)]
    pub first_name: Option<String>,

    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    #[schema(max_length = 50)]
    pub last_name: Option<String>,

    #[validate(length(max = 50, message = "Email must be at most 50 characters"))]
    #[schema(max_length = 50)]
    pub email: Option<String>,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    #[schema(max_length = 30)]
    pub phone: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_update_user(self) -> UpdateUser {
        UpdateUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
        }
    }
}

/// Raw query string of the listing endpoint.
///
/// `limit` and `page` are kept as text: values that do not parse as integers
/// are treated as absent instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Case-insensitive substring of the first name
    pub first_name: Option<String>,
    /// Case-insensitive substring of the last name
    pub last_name: Option<String>,
    /// Page size; the configured default applies when absent or not positive
    #[param(value_type = Option<i64>, example = 10)]
    pub limit: Option<String>,
    /// 1-based page number
    #[param(value_type = Option<i64>, example = 1)]
    pub page: Option<String>,
}

impl ListUsersQuery {
    pub fn into_request(self) -> ListUsersRequest {
        ListUsersRequest {
            filters: UserFilters::new(self.first_name, self.last_name),
            limit: lenient_int(self.limit.as_deref()),
            page: lenient_int(self.page.as_deref()),
        }
    }
}

fn lenient_int(value: Option<&str>) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

/// Decoded listing request; zero means "not supplied" for `limit` and `page`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersRequest {
    pub filters: UserFilters,
    pub limit: i64,
    pub page: i64,
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "5f0c8a52-3a4e-4d3c-9a57-3c1f1f3f9b1e")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at.to_jiff().to_string(),
            updated_at: user.updated_at.to_jiff().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_renders_rfc3339_timestamps() {
        use jiff_diesel::ToDiesel;

        let created: jiff::Timestamp = "2024-06-01T12:30:00Z".parse().unwrap();
        let updated: jiff::Timestamp = "2024-06-02T08:00:00.5Z".parse().unwrap();
        let user = User {
            id: uuid::Uuid::nil(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: None,
            phone: None,
            created_at: created.to_diesel(),
            updated_at: updated.to_diesel(),
        };

        let response = UserResponse::from(user);
        assert_eq!(response.id, "00000000-0000-0000-0000-000000000000");
        assert_eq!(response.created_at, "2024-06-01T12:30:00Z");
        assert_eq!(response.updated_at, "2024-06-02T08:00:00.5Z");
    }

    #[test]
    fn test_list_query_parses_leniently() {
        let request = ListUsersQuery {
            first_name: Some(String::new()),
            last_name: Some("doe".to_string()),
            limit: Some("abc".to_string()),
            page: Some(" 3 ".to_string()),
        }
        .into_request();

        assert_eq!(request.filters, UserFilters::new(None, Some("doe".to_string())));
        assert_eq!(request.limit, 0);
        assert_eq!(request.page, 3);
    }

    #[test]
    fn test_update_request_null_and_absent_are_unchanged() {
        let request: UpdateUserRequest =
            serde_json::from_str(r#"{"id": "ignored", "first_name": null, "email": "a@b.c"}"#)
                .unwrap();

        assert_eq!(request.id, "");
        let changes = request.into_update_user();
        assert_eq!(changes.first_name, None);
        assert_eq!(changes.last_name, None);
        assert_eq!(changes.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_create_request_missing_names_decode_empty() {
        let request: CreateUserRequest = serde_json::from_str(r#"{"email": "a@b.c"}"#).unwrap();
        assert!(request.first_name.is_empty());
        assert!(request.last_name.is_empty());
    }

    #[test]
    fn test_create_request_length_limits() {
        let request = CreateUserRequest {
            first_name: "a".repeat(51),
            last_name: "b".to_string(),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = CreateUserRequest {
            first_name: "a".repeat(50),
            last_name: "b".to_string(),
            phone: Some("1".repeat(30)),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }
}
