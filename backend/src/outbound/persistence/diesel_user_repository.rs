//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Password hashes are stored alongside the account but only leave this
//! adapter through [`StoredCredentials`] for login checks.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{Condition, PasswordHash, Predicate, Role, User, UserField, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::diesel_query_helpers::{PageWindow, contains_pattern, count_to_total, latest_limit};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Like [`map_diesel_error`] but reports a taken username as such.
fn map_write_error(error: diesel::result::Error, username: &str) -> UserRepositoryError {
    if is_unique_violation(&error) {
        UserRepositoryError::duplicate_username(username)
    } else {
        map_diesel_error(error)
    }
}

fn row_to_credentials(row: UserRow) -> Result<StoredCredentials, UserRepositoryError> {
    let role = Role::from_str(&row.role)
        .map_err(|err| UserRepositoryError::query(format!("invalid role in database: {err}")))?;
    let user = User::from_stored(
        UserId::from_uuid(row.id),
        row.first_name,
        row.last_name,
        row.username,
        role,
        row.is_active,
        row.date_created,
    );
    Ok(StoredCredentials {
        user,
        password_hash: PasswordHash::new(row.password_hash),
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    row_to_credentials(row).map(|stored| stored.user)
}

fn filtered(predicate: &Predicate<UserField>) -> users::BoxedQuery<'static, Pg> {
    predicate
        .conditions()
        .iter()
        .fold(users::table.into_boxed(), |query, condition| match condition {
            Condition::Contains { field, needle } => {
                let pattern = contains_pattern(needle);
                match field {
                    UserField::FirstName => query.filter(users::first_name.ilike(pattern)),
                    UserField::LastName => query.filter(users::last_name.ilike(pattern)),
                    UserField::Username => query.filter(users::username.ilike(pattern)),
                    UserField::Role => query.filter(users::role.ilike(pattern)),
                }
            }
            Condition::CreatedAfter { after, .. } => query.filter(users::date_created.gt(*after)),
        })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            first_name: user.first_name(),
            last_name: user.last_name(),
            username: user.username(),
            password_hash: password_hash.as_str(),
            role: user.role().as_str(),
            is_active: user.is_active(),
            date_created: user.date_created(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, user.username()))?;
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_credentials).transpose()
    }

    async fn find_page(
        &self,
        predicate: &Predicate<UserField>,
        request: PageRequest,
    ) -> Result<Page<User>, UserRepositoryError> {
        let window = PageWindow::try_from_request(request).map_err(UserRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let raw_total: i64 = filtered(predicate)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows = filtered(predicate)
            .select(UserRow::as_select())
            .order((users::username.asc(), users::id.asc()))
            .offset(window.offset)
            .limit(window.limit)
            .load::<UserRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let total = count_to_total(raw_total).map_err(UserRepositoryError::query)?;
        let items = rows
            .into_iter()
            .map(row_to_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, total, request))
    }

    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserUpdate {
            first_name: user.first_name(),
            last_name: user.last_name(),
            username: user.username(),
            password_hash: password_hash.as_ref().map(PasswordHash::as_str),
            role: user.role().as_str(),
            is_active: user.is_active(),
        };
        let updated = diesel::update(users::table.filter(users::id.eq(user.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, user.username()))?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.filter(users::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        count_to_total(total).map_err(UserRepositoryError::query)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<User>, UserRepositoryError> {
        let sql_limit = latest_limit(limit).map_err(UserRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .select(UserRow::as_select())
            .order((users::date_created.desc(), users::id.asc()))
            .limit(sql_limit)
            .load::<UserRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_user)
            .collect()
    }
}
