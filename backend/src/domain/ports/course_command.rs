//! Driving port for course mutations.

use async_trait::async_trait;

use crate::domain::{Course, CourseDraft, CourseId, CoursePatch, Error};

/// Course mutation use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseCommand: Send + Sync {
    /// Create a course stamped with the current time.
    async fn create(&self, draft: CourseDraft) -> Result<Course, Error>;

    /// Merge `patch` into an existing course.
    async fn update(&self, id: CourseId, patch: CoursePatch) -> Result<Course, Error>;

    /// Delete a course together with its contents and return its id.
    async fn delete(&self, id: CourseId) -> Result<CourseId, Error>;
}
