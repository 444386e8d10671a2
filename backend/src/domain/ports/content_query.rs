//! Driving port for content reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Content, ContentField, ContentId, CourseId, Error, FilterQuery};

/// One page of a course's contents, labelled with the course name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentListing {
    /// Name of the owning course.
    pub course_name: String,
    /// Matching contents.
    pub page: Page<Content>,
}

/// Content read use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentQuery: Send + Sync {
    /// Filtered, paginated contents of an existing course.
    async fn list(
        &self,
        course_id: CourseId,
        filter: FilterQuery<ContentField>,
        request: PageRequest,
    ) -> Result<ContentListing, Error>;

    /// Single content item of the course, or `not_found`.
    async fn get(&self, course_id: CourseId, id: ContentId) -> Result<Content, Error>;

    /// Total number of contents.
    async fn count(&self) -> Result<u64, Error>;
}
