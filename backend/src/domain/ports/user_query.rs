//! Driving port for user reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, FilterQuery, User, UserField, UserId, Viewer};

/// User read use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Filtered, paginated account listing. Admin only.
    async fn list(
        &self,
        viewer: &Viewer,
        filter: FilterQuery<UserField>,
        request: PageRequest,
    ) -> Result<Page<User>, Error>;

    /// Single account. Admins may read anyone, others only themselves.
    async fn get(&self, viewer: &Viewer, id: UserId) -> Result<User, Error>;

    /// Total number of accounts.
    async fn count(&self) -> Result<u64, Error>;

    /// The five newest accounts.
    async fn latest(&self) -> Result<Vec<User>, Error>;
}
