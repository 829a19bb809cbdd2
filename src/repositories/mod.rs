//! Repository layer for data access operations.
//!
//! `UserRepository` is the storage seam: `PgUserRepository` backs the running
//! service, `InMemoryUserRepository` backs tests and database-free runs.

mod memory_repo;
mod pg_repo;

pub use memory_repo::InMemoryUserRepository;
pub use pg_repo::PgUserRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{NewUser, UpdateUser, User, UserFilters};

/// Persistence operations for user records.
///
/// Operations addressing a single id fail with `AppError::NotFound` when no
/// row matches.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new record and return it as stored.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<User>;

    /// One page of matching records, ordered by creation time then id.
    async fn list(&self, filters: &UserFilters, offset: i64, limit: i64) -> AppResult<Vec<User>>;

    /// Number of records matching `filters`.
    async fn count(&self, filters: &UserFilters) -> AppResult<i64>;

    /// Apply the supplied fields and refresh `updated_at`.
    async fn update(&self, id: Uuid, changes: UpdateUser) -> AppResult<()>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> AppResult<()>;
}
