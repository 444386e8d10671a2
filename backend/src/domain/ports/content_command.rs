//! Driving port for content mutations.

use async_trait::async_trait;

use crate::domain::{Content, ContentDraft, ContentId, ContentPatch, CourseId, Error};

/// Content mutation use-cases, scoped by course.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentCommand: Send + Sync {
    /// Create a content item under an existing course.
    async fn create(&self, course_id: CourseId, draft: ContentDraft) -> Result<Content, Error>;

    /// Merge `patch` into a content item of the course.
    async fn update(
        &self,
        course_id: CourseId,
        id: ContentId,
        patch: ContentPatch,
    ) -> Result<Content, Error>;

    /// Delete a content item of the course and return its id.
    async fn delete(&self, course_id: CourseId, id: ContentId) -> Result<ContentId, Error>;
}
