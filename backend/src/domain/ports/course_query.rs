//! Driving port for course reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Course, CourseContentCount, CourseField, CourseId, Error, FilterQuery};

/// Course read use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseQuery: Send + Sync {
    /// Filtered, paginated course listing.
    async fn list(
        &self,
        filter: FilterQuery<CourseField>,
        request: PageRequest,
    ) -> Result<Page<Course>, Error>;

    /// Single course, or `not_found`.
    async fn get(&self, id: CourseId) -> Result<Course, Error>;

    /// Total number of courses.
    async fn count(&self) -> Result<u64, Error>;

    /// The five newest courses.
    async fn latest(&self) -> Result<Vec<Course>, Error>;

    /// The five courses with the most contents, excluding empty ones.
    async fn most_contents(&self) -> Result<Vec<CourseContentCount>, Error>;
}
