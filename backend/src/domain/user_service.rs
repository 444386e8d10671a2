//! User account and authentication services.
//!
//! [`UserService`] implements the user driving ports plus [`LoginService`].
//! Password hashing goes through the [`PasswordHasher`] port so tests can
//! swap Argon2 for a cheap double.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginService, PasswordHasher, PasswordHasherError, UserCommand, UserQuery, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Capability, Error, FilterQuery, LATEST_LIMIT, LoginCredentials, PasswordHash, Role, User,
    UserDraft, UserField, UserId, UserPatch, Viewer, build_predicate,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Well-formed Argon2id hash that matches no password. Unknown usernames are
/// verified against it so they cost as much as a wrong password.
const UNKNOWN_USER_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$Y0ea1poJCyWCd+yPum+ZQQ$widV9I+g72AejVejuhae7agOmy1OrswsLKL/yIdyL3w";

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateUsername { username } => {
            Error::conflict(format!("username {username} is already taken"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("Could not find user with matching id {id}"))
}

/// User service implementing [`UserCommand`], [`UserQuery`] and
/// [`LoginService`].
#[derive(Clone)]
pub struct UserService<R, H> {
    user_repo: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<R, H> UserService<R, H> {
    /// Create a user service over the repository, hasher and clock.
    pub fn new(user_repo: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_repo,
            hasher,
            clock,
        }
    }
}

impl<R, H> UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn fetch(&self, id: UserId) -> Result<User, Error> {
        self.user_repo
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn insert(&self, draft: UserDraft) -> Result<User, Error> {
        let hash = self.hasher.hash(draft.password()).map_err(map_hasher_error)?;
        let user = User::new(UserId::random(), draft, self.clock.utc());
        self.user_repo
            .create(&user, &hash)
            .await
            .map_err(map_user_repository_error)?;
        Ok(user)
    }

    /// Create an active admin account when no users exist yet.
    ///
    /// Returns the new account, or `None` when the store already holds users.
    pub async fn bootstrap_admin(
        &self,
        username: &str,
        password: Zeroizing<String>,
    ) -> Result<Option<User>, Error> {
        let existing = self
            .user_repo
            .count()
            .await
            .map_err(map_user_repository_error)?;
        if existing > 0 {
            return Ok(None);
        }
        let draft = UserDraft::new("Admin", "User", username, password)?.with_role(Role::Admin);
        let admin = self.insert(draft).await?;
        info!(username = admin.username(), "bootstrapped admin account");
        Ok(Some(admin))
    }
}

#[async_trait]
impl<R, H> UserCommand for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn create(&self, viewer: &Viewer, draft: UserDraft) -> Result<User, Error> {
        viewer.authorize(Capability::ManageUsers)?;
        self.insert(draft).await
    }

    async fn update(&self, viewer: &Viewer, id: UserId, patch: UserPatch) -> Result<User, Error> {
        viewer.authorize_self_or_admin(id)?;
        let current = self.fetch(id).await?;
        if !viewer.is_admin() && patch.changes_privileges(&current) {
            return Err(Error::forbidden(
                "only administrators may change role or isActive",
            ));
        }
        let (updated, password) = current.apply(patch)?;
        let hash: Option<PasswordHash> = password
            .map(|value| self.hasher.hash(value.as_str()))
            .transpose()
            .map_err(map_hasher_error)?;
        let matched = self
            .user_repo
            .update(&updated, hash)
            .await
            .map_err(map_user_repository_error)?;
        if !matched {
            return Err(user_not_found(id));
        }
        Ok(updated)
    }

    async fn delete(&self, viewer: &Viewer, id: UserId) -> Result<UserId, Error> {
        viewer.authorize(Capability::ManageUsers)?;
        if viewer.id() == id {
            return Err(Error::forbidden(
                "administrators cannot delete their own account",
            ));
        }
        let removed = self
            .user_repo
            .delete(id)
            .await
            .map_err(map_user_repository_error)?;
        if !removed {
            return Err(user_not_found(id));
        }
        Ok(id)
    }
}

#[async_trait]
impl<R, H> UserQuery for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn list(
        &self,
        viewer: &Viewer,
        filter: FilterQuery<UserField>,
        request: PageRequest,
    ) -> Result<Page<User>, Error> {
        viewer.authorize(Capability::ManageUsers)?;
        let predicate = build_predicate(&filter)?;
        self.user_repo
            .find_page(&predicate, request)
            .await
            .map_err(map_user_repository_error)
    }

    async fn get(&self, viewer: &Viewer, id: UserId) -> Result<User, Error> {
        viewer.authorize_self_or_admin(id)?;
        self.fetch(id).await
    }

    async fn count(&self) -> Result<u64, Error> {
        self.user_repo
            .count()
            .await
            .map_err(map_user_repository_error)
    }

    async fn latest(&self) -> Result<Vec<User>, Error> {
        self.user_repo
            .latest(LATEST_LIMIT)
            .await
            .map_err(map_user_repository_error)
    }
}

#[async_trait]
impl<R, H> LoginService for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(stored) = self
            .user_repo
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_repository_error)?
        else {
            let dummy = PasswordHash::new(UNKNOWN_USER_HASH);
            self.hasher
                .verify(credentials.password(), &dummy)
                .map_err(map_hasher_error)?;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hasher_error)?;
        if !verified {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if !stored.user.is_active() {
            return Err(Error::unauthorized("account is inactive"));
        }
        Ok(stored.user)
    }

    async fn resolve_session(&self, id: UserId) -> Result<User, Error> {
        let found = self
            .user_repo
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?;
        match found {
            Some(user) if user.is_active() => Ok(user),
            _ => Err(Error::unauthorized("session is no longer valid")),
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
