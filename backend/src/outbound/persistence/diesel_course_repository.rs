//! PostgreSQL-backed `CourseRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{CourseRepository, CourseRepositoryError};
use crate::domain::{Condition, Course, CourseContentCount, CourseField, CourseId, Predicate};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_query_helpers::{PageWindow, contains_pattern, count_to_total, latest_limit};
use super::models::{CourseRow, CourseUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{contents, courses};

/// Diesel-backed implementation of the course repository port.
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CourseRepositoryError {
    map_basic_pool_error(error, CourseRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CourseRepositoryError {
    map_basic_diesel_error(
        error,
        CourseRepositoryError::query,
        CourseRepositoryError::connection,
    )
}

fn row_to_course(row: CourseRow) -> Course {
    Course::from_stored(
        CourseId::from_uuid(row.id),
        row.name,
        row.description,
        row.date_created,
    )
}

fn course_to_row(course: &Course) -> CourseRow {
    CourseRow {
        id: *course.id().as_uuid(),
        name: course.name().to_owned(),
        description: course.description().to_owned(),
        date_created: course.date_created(),
    }
}

/// Apply every condition of `predicate` to a boxed courses query.
fn filtered(predicate: &Predicate<CourseField>) -> courses::BoxedQuery<'static, Pg> {
    predicate
        .conditions()
        .iter()
        .fold(courses::table.into_boxed(), |query, condition| {
            match condition {
                Condition::Contains {
                    field: CourseField::Name,
                    needle,
                } => query.filter(courses::name.ilike(contains_pattern(needle))),
                Condition::Contains {
                    field: CourseField::Description,
                    needle,
                } => query.filter(courses::description.ilike(contains_pattern(needle))),
                // Date fields only ever produce `CreatedAfter`.
                Condition::Contains {
                    field: CourseField::DateCreated,
                    ..
                } => query,
                Condition::CreatedAfter { after, .. } => {
                    query.filter(courses::date_created.gt(*after))
                }
            }
        })
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn create(&self, course: &Course) -> Result<(), CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(courses::table)
            .values(&course_to_row(course))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = courses::table
            .filter(courses::id.eq(id.as_uuid()))
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_course))
    }

    async fn find_page(
        &self,
        predicate: &Predicate<CourseField>,
        request: PageRequest,
    ) -> Result<Page<Course>, CourseRepositoryError> {
        let window = PageWindow::try_from_request(request).map_err(CourseRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let raw_total: i64 = filtered(predicate)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows = filtered(predicate)
            .select(CourseRow::as_select())
            .order((
                courses::name.asc(),
                courses::description.asc(),
                courses::id.asc(),
            ))
            .offset(window.offset)
            .limit(window.limit)
            .load::<CourseRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let total = count_to_total(raw_total).map_err(CourseRepositoryError::query)?;
        Ok(Page::new(
            rows.into_iter().map(row_to_course).collect(),
            total,
            request,
        ))
    }

    async fn update(&self, course: &Course) -> Result<bool, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = CourseUpdate {
            name: course.name(),
            description: course.description(),
        };
        let updated = diesel::update(courses::table.filter(courses::id.eq(course.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: CourseId) -> Result<bool, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Contents go with the course via ON DELETE CASCADE.
        let deleted = diesel::delete(courses::table.filter(courses::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn count(&self) -> Result<u64, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = courses::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        count_to_total(total).map_err(CourseRepositoryError::query)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Course>, CourseRepositoryError> {
        let sql_limit = latest_limit(limit).map_err(CourseRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = courses::table
            .select(CourseRow::as_select())
            .order((courses::date_created.desc(), courses::id.asc()))
            .limit(sql_limit)
            .load::<CourseRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_course).collect())
    }

    async fn content_counts(&self) -> Result<Vec<CourseContentCount>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let counts: HashMap<Uuid, i64> = contents::table
            .group_by(contents::course_id)
            .select((contents::course_id, count_star()))
            .load::<(Uuid, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect();
        let rows = courses::table
            .select(CourseRow::as_select())
            .load::<CourseRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| {
                let raw = counts.get(&row.id).copied().unwrap_or_default();
                let content_count = count_to_total(raw).map_err(CourseRepositoryError::query)?;
                Ok(CourseContentCount {
                    course: row_to_course(row),
                    content_count,
                })
            })
            .collect()
    }
}
