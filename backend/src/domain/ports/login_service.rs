//! Driving port for login and session resolution.
//!
//! Inbound adapters call it to authenticate credentials and to turn a
//! session's user id back into an active account, without knowing the
//! backing infrastructure.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User, UserId};

/// Authentication use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated, active user.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Reload the account behind a session. Missing or deactivated accounts
    /// yield `unauthorized`.
    async fn resolve_session(&self, id: UserId) -> Result<User, Error>;
}
