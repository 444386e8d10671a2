//! Course domain service.
//!
//! Implements the course driving ports on top of a [`CourseRepository`],
//! stamping new courses with the injected clock.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};

use crate::domain::ports::{CourseCommand, CourseQuery, CourseRepository, CourseRepositoryError};
use crate::domain::{
    Course, CourseContentCount, CourseDraft, CourseField, CourseId, CoursePatch, Error,
    FilterQuery, LATEST_LIMIT, TOP_COURSES_LIMIT, build_predicate, rank_by_content_count,
};

pub(super) fn map_course_repository_error(error: CourseRepositoryError) -> Error {
    match error {
        CourseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("course repository unavailable: {message}"))
        }
        CourseRepositoryError::Query { message } => {
            Error::internal(format!("course repository error: {message}"))
        }
    }
}

pub(super) fn course_not_found(id: CourseId) -> Error {
    Error::not_found(format!("Could not find course with matching id {id}"))
}

/// Course service implementing [`CourseCommand`] and [`CourseQuery`].
#[derive(Clone)]
pub struct CourseService<R> {
    course_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> CourseService<R> {
    /// Create a course service over the given repository and clock.
    pub fn new(course_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { course_repo, clock }
    }
}

impl<R> CourseService<R>
where
    R: CourseRepository,
{
    async fn fetch(&self, id: CourseId) -> Result<Course, Error> {
        self.course_repo
            .find_by_id(id)
            .await
            .map_err(map_course_repository_error)?
            .ok_or_else(|| course_not_found(id))
    }
}

#[async_trait]
impl<R> CourseCommand for CourseService<R>
where
    R: CourseRepository,
{
    async fn create(&self, draft: CourseDraft) -> Result<Course, Error> {
        let course = Course::new(CourseId::random(), draft, self.clock.utc());
        self.course_repo
            .create(&course)
            .await
            .map_err(map_course_repository_error)?;
        Ok(course)
    }

    async fn update(&self, id: CourseId, patch: CoursePatch) -> Result<Course, Error> {
        let updated = self.fetch(id).await?.apply(patch)?;
        let matched = self
            .course_repo
            .update(&updated)
            .await
            .map_err(map_course_repository_error)?;
        if !matched {
            return Err(course_not_found(id));
        }
        Ok(updated)
    }

    async fn delete(&self, id: CourseId) -> Result<CourseId, Error> {
        self.fetch(id).await?;
        let removed = self
            .course_repo
            .delete(id)
            .await
            .map_err(map_course_repository_error)?;
        if !removed {
            return Err(course_not_found(id));
        }
        Ok(id)
    }
}

#[async_trait]
impl<R> CourseQuery for CourseService<R>
where
    R: CourseRepository,
{
    async fn list(
        &self,
        filter: FilterQuery<CourseField>,
        request: PageRequest,
    ) -> Result<Page<Course>, Error> {
        let predicate = build_predicate(&filter)?;
        self.course_repo
            .find_page(&predicate, request)
            .await
            .map_err(map_course_repository_error)
    }

    async fn get(&self, id: CourseId) -> Result<Course, Error> {
        self.fetch(id).await
    }

    async fn count(&self) -> Result<u64, Error> {
        self.course_repo
            .count()
            .await
            .map_err(map_course_repository_error)
    }

    async fn latest(&self) -> Result<Vec<Course>, Error> {
        self.course_repo
            .latest(LATEST_LIMIT)
            .await
            .map_err(map_course_repository_error)
    }

    async fn most_contents(&self) -> Result<Vec<CourseContentCount>, Error> {
        let counts = self
            .course_repo
            .content_counts()
            .await
            .map_err(map_course_repository_error)?;
        Ok(rank_by_content_count(counts, TOP_COURSES_LIMIT))
    }
}

#[cfg(test)]
#[path = "course_service_tests.rs"]
mod tests;
