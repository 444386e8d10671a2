//! Driving port for user account mutations.
//!
//! Every operation receives the acting [`Viewer`] so the service can apply
//! the self-service rules without reaching into transport state.

use async_trait::async_trait;

use crate::domain::{Error, User, UserDraft, UserId, UserPatch, Viewer};

/// User mutation use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Create an account. Admin only.
    async fn create(&self, viewer: &Viewer, draft: UserDraft) -> Result<User, Error>;

    /// Merge `patch` into an account. Admins may update anyone; other users
    /// only themselves and without touching role or activation.
    async fn update(&self, viewer: &Viewer, id: UserId, patch: UserPatch) -> Result<User, Error>;

    /// Delete an account and return its id. Admin only, never self.
    async fn delete(&self, viewer: &Viewer, id: UserId) -> Result<UserId, Error>;
}
