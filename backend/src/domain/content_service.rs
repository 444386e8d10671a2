//! Content domain service.
//!
//! Every operation first resolves the owning course so callers get a
//! course-level `not_found` before any content lookup happens.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageRequest;

use super::course_service::{course_not_found, map_course_repository_error};
use crate::domain::ports::{
    ContentCommand, ContentListing, ContentQuery, ContentRepository, ContentRepositoryError,
    CourseRepository,
};
use crate::domain::{
    Content, ContentDraft, ContentField, ContentId, ContentPatch, Course, CourseId, Error,
    FilterQuery, build_predicate,
};

fn map_content_repository_error(error: ContentRepositoryError) -> Error {
    match error {
        ContentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("content repository unavailable: {message}"))
        }
        ContentRepositoryError::Query { message } => {
            Error::internal(format!("content repository error: {message}"))
        }
    }
}

fn content_not_found(id: ContentId) -> Error {
    Error::not_found(format!("Could not find content with matching id {id}"))
}

/// Content service implementing [`ContentCommand`] and [`ContentQuery`].
#[derive(Clone)]
pub struct ContentService<C, R> {
    content_repo: Arc<C>,
    course_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<C, R> ContentService<C, R> {
    /// Create a content service over the content and course repositories.
    pub fn new(content_repo: Arc<C>, course_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            content_repo,
            course_repo,
            clock,
        }
    }
}

impl<C, R> ContentService<C, R>
where
    C: ContentRepository,
    R: CourseRepository,
{
    async fn require_course(&self, course_id: CourseId) -> Result<Course, Error> {
        self.course_repo
            .find_by_id(course_id)
            .await
            .map_err(map_course_repository_error)?
            .ok_or_else(|| course_not_found(course_id))
    }

    async fn fetch(&self, course_id: CourseId, id: ContentId) -> Result<Content, Error> {
        self.require_course(course_id).await?;
        self.content_repo
            .find(course_id, id)
            .await
            .map_err(map_content_repository_error)?
            .ok_or_else(|| content_not_found(id))
    }
}

#[async_trait]
impl<C, R> ContentCommand for ContentService<C, R>
where
    C: ContentRepository,
    R: CourseRepository,
{
    async fn create(&self, course_id: CourseId, draft: ContentDraft) -> Result<Content, Error> {
        self.require_course(course_id).await?;
        let content = Content::new(ContentId::random(), course_id, draft, self.clock.utc());
        self.content_repo
            .create(&content)
            .await
            .map_err(map_content_repository_error)?;
        Ok(content)
    }

    async fn update(
        &self,
        course_id: CourseId,
        id: ContentId,
        patch: ContentPatch,
    ) -> Result<Content, Error> {
        let updated = self.fetch(course_id, id).await?.apply(patch)?;
        let matched = self
            .content_repo
            .update(&updated)
            .await
            .map_err(map_content_repository_error)?;
        if !matched {
            return Err(content_not_found(id));
        }
        Ok(updated)
    }

    async fn delete(&self, course_id: CourseId, id: ContentId) -> Result<ContentId, Error> {
        self.fetch(course_id, id).await?;
        let removed = self
            .content_repo
            .delete(course_id, id)
            .await
            .map_err(map_content_repository_error)?;
        if !removed {
            return Err(content_not_found(id));
        }
        Ok(id)
    }
}

#[async_trait]
impl<C, R> ContentQuery for ContentService<C, R>
where
    C: ContentRepository,
    R: CourseRepository,
{
    async fn list(
        &self,
        course_id: CourseId,
        filter: FilterQuery<ContentField>,
        request: PageRequest,
    ) -> Result<ContentListing, Error> {
        let predicate = build_predicate(&filter)?;
        let course = self.require_course(course_id).await?;
        let page = self
            .content_repo
            .find_page(course_id, &predicate, request)
            .await
            .map_err(map_content_repository_error)?;
        Ok(ContentListing {
            course_name: course.name().to_owned(),
            page,
        })
    }

    async fn get(&self, course_id: CourseId, id: ContentId) -> Result<Content, Error> {
        self.fetch(course_id, id).await
    }

    async fn count(&self) -> Result<u64, Error> {
        self.content_repo
            .count()
            .await
            .map_err(map_content_repository_error)
    }
}

#[cfg(test)]
#[path = "content_service_tests.rs"]
mod tests;
