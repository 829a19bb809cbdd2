//! PostgreSQL user repository using diesel_async.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::ToDiesel;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{NewUser, UpdateUser, User, UserFilters};
use crate::repositories::UserRepository;
use crate::schema::users;

/// User repository holding an async connection pool.
///
/// `AsyncDbPool` is reference counted, so cloning the repository is cheap.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: AsyncDbPool,
}

impl PgUserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

/// Base query with the listing filters applied.
///
/// Shared by `list` and `count` so a page and its total always agree.
fn filtered(filters: &UserFilters) -> users::BoxedQuery<'static, Pg> {
    let mut query = users::table.into_boxed();
    if let Some(pattern) = filters.first_name_pattern() {
        query = query.filter(users::first_name.ilike(pattern));
    }
    if let Some(pattern) = filters.last_name_pattern() {
        query = query.filter(users::last_name.ilike(pattern));
    }
    query
}

/// One page of the filtered query in `(created_at, id)` order.
fn page_query(filters: &UserFilters, offset: i64, limit: i64) -> users::BoxedQuery<'static, Pg> {
    filtered(filters)
        .order((users::created_at.asc(), users::id.asc()))
        .offset(offset)
        .limit(limit)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert user"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        let mut conn = self.pool.get().await?;

        users::table
            .find(id)
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find user"))?
            .ok_or_else(|| AppError::user_not_found(id))
    }

    async fn list(&self, filters: &UserFilters, offset: i64, limit: i64) -> AppResult<Vec<User>> {
        let mut conn = self.pool.get().await?;

        page_query(filters, offset, limit)
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list users"))
    }

    async fn count(&self, filters: &UserFilters) -> AppResult<i64> {
        let mut conn = self.pool.get().await?;

        filtered(filters)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "count users"))
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        let now = jiff::Timestamp::now().to_diesel();

        let affected = diesel::update(users::table.find(id))
            .set((&changes, users::updated_at.eq(now)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update user"))?;

        if affected == 0 {
            return Err(AppError::user_not_found(id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        let affected = diesel::delete(users::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete user"))?;

        if affected == 0 {
            return Err(AppError::user_not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "ping database"))?;
        Ok(())
    }
}
