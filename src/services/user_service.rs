//! User service for business logic operations.
//!
//! A thin layer over `UserRepository`: it assigns identifiers on create and
//! otherwise passes calls through, emitting events for mutations.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{NewUser, UpdateUser, User, UserFilters};
use crate::repositories::UserRepository;

/// User service for handling user-related business logic.
///
/// Cloning is cheap: the repository is shared behind an `Arc`.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Creates a new user with a freshly generated id.
    pub async fn create_user(
        &self,
        first_name: String,
        last_name: String,
        email: Option<String>,
        phone: Option<String>,
    ) -> AppResult<User> {
        let new_user = NewUser {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            phone,
        };

        let user = self.repo.create(new_user).await?;
        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Gets a user by id, or `NotFound`.
    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.repo.find_by_id(id).await
    }

    /// One page of users matching `filters`.
    ///
    /// # Arguments
    /// * `filters` - Name filters; pass the same value to [`Self::count_users`]
    /// * `offset` - Number of records to skip
    /// * `limit` - Maximum number of records to return
    pub async fn get_all_users(
        &self,
        filters: &UserFilters,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<User>> {
        self.repo.list(filters, offset, limit).await
    }

    pub async fn count_users(&self, filters: &UserFilters) -> AppResult<i64> {
        self.repo.count(filters).await
    }

    /// Partially updates a user; fields left as `None` are untouched.
    pub async fn update_user(&self, id: Uuid, changes: UpdateUser) -> AppResult<()> {
        self.repo.update(id, changes).await?;
        tracing::info!(user_id = %id, "Updated user");
        Ok(())
    }

    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }

    /// Checks that the backing store answers.
    pub async fn ping(&self) -> AppResult<()> {
        self.repo.ping().await
    }
}
