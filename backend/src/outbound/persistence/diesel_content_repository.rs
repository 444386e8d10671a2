//! PostgreSQL-backed `ContentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::{Eq as Equals, Filter};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{ContentRepository, ContentRepositoryError};
use crate::domain::{Condition, Content, ContentField, ContentId, CourseId, Predicate};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_query_helpers::{PageWindow, contains_pattern, count_to_total};
use super::models::{ContentRow, ContentUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::contents;

type ScopedContent =
    Filter<Filter<contents::table, Equals<contents::id, Uuid>>, Equals<contents::course_id, Uuid>>;

/// The single row `id` inside `course_id`, as an update or delete target.
fn scoped(course_id: CourseId, id: ContentId) -> ScopedContent {
    contents::table
        .filter(contents::id.eq(*id.as_uuid()))
        .filter(contents::course_id.eq(*course_id.as_uuid()))
}

/// Diesel-backed implementation of the content repository port.
#[derive(Clone)]
pub struct DieselContentRepository {
    pool: DbPool,
}

impl DieselContentRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContentRepositoryError {
    map_basic_pool_error(error, ContentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ContentRepositoryError {
    map_basic_diesel_error(
        error,
        ContentRepositoryError::query,
        ContentRepositoryError::connection,
    )
}

impl From<ContentRow> for Content {
    fn from(row: ContentRow) -> Self {
        Self::from_stored(
            ContentId::from_uuid(row.id),
            CourseId::from_uuid(row.course_id),
            row.name,
            row.description,
            row.image_url,
            row.date_created,
        )
    }
}

impl From<&Content> for ContentRow {
    fn from(content: &Content) -> Self {
        Self {
            id: *content.id().as_uuid(),
            course_id: *content.course_id().as_uuid(),
            name: content.name().to_owned(),
            description: content.description().to_owned(),
            image_url: content.image_url().map(str::to_owned),
            date_created: content.date_created(),
        }
    }
}

/// Contents of one course narrowed by `predicate`.
fn filtered(
    course_id: CourseId,
    predicate: &Predicate<ContentField>,
) -> contents::BoxedQuery<'static, Pg> {
    let scoped = contents::table
        .filter(contents::course_id.eq(*course_id.as_uuid()))
        .into_boxed();
    predicate
        .conditions()
        .iter()
        .fold(scoped, |query, condition| match condition {
            Condition::Contains {
                field: ContentField::Name,
                needle,
            } => query.filter(contents::name.ilike(contains_pattern(needle))),
            Condition::Contains {
                field: ContentField::Description,
                needle,
            } => query.filter(contents::description.ilike(contains_pattern(needle))),
            Condition::Contains {
                field: ContentField::DateCreated,
                ..
            } => query,
            Condition::CreatedAfter { after, .. } => {
                query.filter(contents::date_created.gt(*after))
            }
        })
}

#[async_trait]
impl ContentRepository for DieselContentRepository {
    async fn create(&self, content: &Content) -> Result<(), ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(contents::table)
            .values(&ContentRow::from(content))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(
        &self,
        course_id: CourseId,
        id: ContentId,
    ) -> Result<Option<Content>, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = contents::table
            .filter(contents::id.eq(id.as_uuid()))
            .filter(contents::course_id.eq(course_id.as_uuid()))
            .select(ContentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Content::from))
    }

    async fn find_page(
        &self,
        course_id: CourseId,
        predicate: &Predicate<ContentField>,
        request: PageRequest,
    ) -> Result<Page<Content>, ContentRepositoryError> {
        let window =
            PageWindow::try_from_request(request).map_err(ContentRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let raw_total: i64 = filtered(course_id, predicate)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows = filtered(course_id, predicate)
            .select(ContentRow::as_select())
            .order((contents::name.asc(), contents::id.asc()))
            .offset(window.offset)
            .limit(window.limit)
            .load::<ContentRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let total = count_to_total(raw_total).map_err(ContentRepositoryError::query)?;
        Ok(Page::new(
            rows.into_iter().map(Content::from).collect(),
            total,
            request,
        ))
    }

    async fn update(&self, content: &Content) -> Result<bool, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ContentUpdate {
            name: content.name(),
            description: content.description(),
            image_url: content.image_url(),
        };
        let updated = diesel::update(scoped(content.course_id(), content.id()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(
        &self,
        course_id: CourseId,
        id: ContentId,
    ) -> Result<bool, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(scoped(course_id, id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn count(&self) -> Result<u64, ContentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = contents::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        count_to_total(total).map_err(ContentRepositoryError::query)
    }
}
