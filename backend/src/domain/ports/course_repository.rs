//! Port for course persistence and the aggregate reads behind the dashboard.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Course, CourseContentCount, CourseField, CourseId, Predicate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by course repository adapters.
    pub enum CourseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "course repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "course repository query failed: {message}",
    }
}

/// Port for reading and writing courses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a new course.
    async fn create(&self, course: &Course) -> Result<(), CourseRepositoryError>;

    /// Find a course by id.
    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CourseRepositoryError>;

    /// Load one page of courses matching `predicate`, ordered by name then
    /// description, with the total match count.
    async fn find_page(
        &self,
        predicate: &Predicate<CourseField>,
        request: PageRequest,
    ) -> Result<Page<Course>, CourseRepositoryError>;

    /// Overwrite a stored course. Returns `false` when no row matched.
    async fn update(&self, course: &Course) -> Result<bool, CourseRepositoryError>;

    /// Delete a course and its contents. Returns `false` when no row matched.
    async fn delete(&self, id: CourseId) -> Result<bool, CourseRepositoryError>;

    /// Total number of courses.
    async fn count(&self) -> Result<u64, CourseRepositoryError>;

    /// Most recently created courses, newest first.
    async fn latest(&self, limit: usize) -> Result<Vec<Course>, CourseRepositoryError>;

    /// Every course paired with its content count.
    async fn content_counts(&self) -> Result<Vec<CourseContentCount>, CourseRepositoryError>;
}
