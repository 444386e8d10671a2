//! Port for content persistence, always scoped by the owning course.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Content, ContentField, ContentId, CourseId, Predicate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by content repository adapters.
    pub enum ContentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "content repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "content repository query failed: {message}",
    }
}

/// Port for reading and writing contents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Insert a new content item. The owning course must exist.
    async fn create(&self, content: &Content) -> Result<(), ContentRepositoryError>;

    /// Find a content item that belongs to `course_id`.
    async fn find(
        &self,
        course_id: CourseId,
        id: ContentId,
    ) -> Result<Option<Content>, ContentRepositoryError>;

    /// Load one page of the course's contents matching `predicate`.
    async fn find_page(
        &self,
        course_id: CourseId,
        predicate: &Predicate<ContentField>,
        request: PageRequest,
    ) -> Result<Page<Content>, ContentRepositoryError>;

    /// Overwrite a stored content item. Returns `false` when no row matched.
    async fn update(&self, content: &Content) -> Result<bool, ContentRepositoryError>;

    /// Delete a content item within its course. Returns `false` when no row
    /// matched.
    async fn delete(
        &self,
        course_id: CourseId,
        id: ContentId,
    ) -> Result<bool, ContentRepositoryError>;

    /// Total number of contents across all courses.
    async fn count(&self) -> Result<u64, ContentRepositoryError>;
}
