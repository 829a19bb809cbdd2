//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::api::endpoints::UserEndpoints;
use crate::config::PaginationConfig;
use crate::repositories::UserRepository;
use crate::services::UserService;

/// Application state shared by all handlers.
///
/// Cloning is cheap: the repository sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub users: UserEndpoints,
}

impl AppState {
    /// Wires the service and endpoints on top of a repository.
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(Arc::new(PgUserRepository::new(pool)), pagination);
    /// ```
    pub fn new(repository: Arc<dyn UserRepository>, pagination: PaginationConfig) -> Self {
        let service = UserService::new(repository);
        Self {
            users: UserEndpoints::new(service, pagination),
        }
    }
}
