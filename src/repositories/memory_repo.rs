//! In-memory user repository for tests and database-free runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use jiff_diesel::ToDiesel;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User, UserFilters};
use crate::repositories::UserRepository;

#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matching records in listing order.
    fn sorted_matches(users: &HashMap<Uuid, User>, filters: &UserFilters) -> Vec<User> {
        let mut matches: Vec<User> = users
            .values()
            .filter(|user| filters.matches(user))
            .cloned()
            .collect();
        matches.sort_by_key(|user| (user.created_at.to_jiff(), user.id));
        matches
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&new_user.id) {
            return Err(AppError::Database {
                operation: "insert user".to_string(),
                source: anyhow::anyhow!("duplicate key value for id {}", new_user.id),
            });
        }

        let now = jiff::Timestamp::now().to_diesel();
        let user = User {
            id: new_user.id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            phone: new_user.phone,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        let users = self.users.read().await;
        users
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::user_not_found(id))
    }

    async fn list(&self, filters: &UserFilters, offset: i64, limit: i64) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);

        Ok(Self::sorted_matches(&users, filters)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn count(&self, filters: &UserFilters) -> AppResult<i64> {
        let users = self.users.read().await;
        let total = users.values().filter(|user| filters.matches(user)).count();
        Ok(i64::try_from(total).unwrap_or(i64::MAX))
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::user_not_found(id))?;

        changes.apply_to(user);
        user.updated_at = jiff::Timestamp::now().to_diesel();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut users = self.users.write().await;
        users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::user_not_found(id))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(first_name: &str, last_name: &str) -> NewUser {
        NewUser {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: None,
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(new_user("Ada", "Lovelace")).await.unwrap();

        let found = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(found.first_name, "Ada");
        assert_eq!(found.created_at.to_jiff(), found.updated_at.to_jiff());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let repo = InMemoryUserRepository::new();
        let user = new_user("Ada", "Lovelace");
        repo.create(user.clone()).await.unwrap();

        let err = repo.create(user).await.unwrap_err();
        assert!(matches!(err, AppError::Database { .. }));
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let repo = InMemoryUserRepository::new();
        let id = Uuid::new_v4();

        assert!(repo.find_by_id(id).await.unwrap_err().is_not_found());
        assert!(
            repo.update(id, UpdateUser::default())
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(repo.delete(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_pages_in_creation_order() {
        let repo = InMemoryUserRepository::new();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(repo.create(new_user(&format!("User{i}"), "Doe")).await.unwrap().id);
        }

        let filters = UserFilters::default();
        let first = repo.list(&filters, 0, 2).await.unwrap();
        let second = repo.list(&filters, 2, 2).await.unwrap();
        let third = repo.list(&filters, 4, 2).await.unwrap();

        let paged: Vec<Uuid> = first
            .iter()
            .chain(&second)
            .chain(&third)
            .map(|u| u.id)
            .collect();
        let all: Vec<Uuid> = repo.list(&filters, 0, 10).await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(paged, all);
        assert_eq!(all.len(), 5);
        assert_eq!(third.len(), 1);
    }

    #[tokio::test]
    async fn test_count_and_list_share_filters() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("Johnny", "Doe")).await.unwrap();
        repo.create(new_user("john", "Smith")).await.unwrap();
        repo.create(new_user("Jane", "Doe")).await.unwrap();

        let filters = UserFilters::new(Some("JOHN".to_string()), None);
        assert_eq!(repo.count(&filters).await.unwrap(), 2);
        assert_eq!(repo.list(&filters, 0, 10).await.unwrap().len(), 2);

        let filters = UserFilters::new(Some("j".to_string()), Some("doe".to_string()));
        assert_eq!(repo.count(&filters).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_applies_only_supplied_fields() {
        let repo = InMemoryUserRepository::new();
        let mut user = new_user("Ada", "Lovelace");
        user.email = Some("ada@example.com".to_string());
        let created = repo.create(user).await.unwrap();

        repo.update(
            created.id,
            UpdateUser {
                last_name: Some("Byron".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let updated = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(updated.first_name, "Ada");
        assert_eq!(updated.last_name, "Byron");
        assert_eq!(updated.email.as_deref(), Some("ada@example.com"));
        assert!(updated.updated_at.to_jiff() >= created.updated_at.to_jiff());
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(new_user("Ada", "Lovelace")).await.unwrap();

        repo.delete(created.id).await.unwrap();
        assert!(repo.find_by_id(created.id).await.unwrap_err().is_not_found());
        assert_eq!(repo.count(&UserFilters::default()).await.unwrap(), 0);
    }
}
