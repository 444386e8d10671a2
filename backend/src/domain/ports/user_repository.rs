//! Port for user persistence, including stored password hashes.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{PasswordHash, Predicate, User, UserField, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// Another account already uses the username.
        DuplicateUsername { username: String } =>
            "username {username} is already taken",
    }
}

/// A user together with the hash needed to verify a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Account the hash belongs to.
    pub user: User,
    /// Encoded password hash.
    pub password_hash: PasswordHash,
}

/// Port for reading and writing user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user with its password hash.
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserRepositoryError>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Find a user and its password hash by exact username.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Load one page of users matching `predicate`, ordered by username.
    async fn find_page(
        &self,
        predicate: &Predicate<UserField>,
        request: PageRequest,
    ) -> Result<Page<User>, UserRepositoryError>;

    /// Overwrite a stored user, replacing the hash when one is supplied.
    /// Returns `false` when no row matched.
    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<bool, UserRepositoryError>;

    /// Delete a user. Returns `false` when no row matched.
    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError>;

    /// Total number of users.
    async fn count(&self) -> Result<u64, UserRepositoryError>;

    /// Most recently created users, newest first.
    async fn latest(&self, limit: usize) -> Result<Vec<User>, UserRepositoryError>;
}
