use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

/// User model for reading from database
/// Derives Queryable for SELECT operations and Selectable for type-safe column selection
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// NewUser model for inserting new records.
/// The id is assigned by the service layer; timestamps come from column defaults.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// UpdateUser model for partial updates
/// Derives AsChangeset for UPDATE operations with optional fields
#[derive(Debug, AsChangeset, Clone, Default, PartialEq, Eq)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UpdateUser {
    /// Applies the supplied fields onto an existing record.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            user.email = Some(email.clone());
        }
        if let Some(phone) = &self.phone {
            user.phone = Some(phone.clone());
        }
    }
}

/// Listing criteria shared by counting and paging queries.
///
/// Both fields are case-insensitive substring matches. Empty values are
/// dropped on construction so an empty query parameter means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilters {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserFilters {
    pub fn new(first_name: Option<String>, last_name: Option<String>) -> Self {
        Self {
            first_name: first_name.filter(|v| !v.is_empty()),
            last_name: last_name.filter(|v| !v.is_empty()),
        }
    }

    /// `ILIKE` pattern for the first name filter, with wildcards escaped.
    pub fn first_name_pattern(&self) -> Option<String> {
        self.first_name.as_deref().map(like_pattern)
    }

    /// `ILIKE` pattern for the last name filter, with wildcards escaped.
    pub fn last_name_pattern(&self) -> Option<String> {
        self.last_name.as_deref().map(like_pattern)
    }

    /// In-process equivalent of the SQL predicate.
    pub fn matches(&self, user: &User) -> bool {
        contains_ignore_case(&user.first_name, self.first_name.as_deref())
            && contains_ignore_case(&user.last_name, self.last_name.as_deref())
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
