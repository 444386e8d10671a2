//! Tests for the content service.

use std::sync::Arc;

use mockall::predicate::eq;
use pagination::{Page, PageRequest};

use super::*;
use crate::domain::ports::{CourseRepositoryError, MockContentRepository, MockCourseRepository};
use crate::domain::test_clock::{fixture_clock, fixture_timestamp};
use crate::domain::{CourseDraft, ErrorCode};

type Service = ContentService<MockContentRepository, MockCourseRepository>;

fn math_course() -> Course {
    Course::new(
        CourseId::random(),
        CourseDraft::new("Math", "Algebra").expect("valid draft"),
        fixture_timestamp(),
    )
}

fn lesson(course_id: CourseId) -> Content {
    Content::new(
        ContentId::random(),
        course_id,
        ContentDraft::new("Lesson", "Sets", Some("https://cdn/a.png".to_owned()))
            .expect("valid draft"),
        fixture_timestamp(),
    )
}

fn courses_with(course: Option<Course>) -> MockCourseRepository {
    let mut repo = MockCourseRepository::new();
    repo.expect_find_by_id().return_once(move |_| Ok(course));
    repo
}

fn service(contents: MockContentRepository, courses: MockCourseRepository) -> Service {
    ContentService::new(Arc::new(contents), Arc::new(courses), fixture_clock())
}

#[tokio::test]
async fn create_requires_existing_course() {
    let mut contents = MockContentRepository::new();
    contents.expect_create().times(0);

    let course_id = CourseId::random();
    let error = service(contents, courses_with(None))
        .create(
            course_id,
            ContentDraft::new("Lesson", "Sets", None).expect("valid draft"),
        )
        .await
        .expect_err("missing course");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(
        error.message(),
        format!("Could not find course with matching id {course_id}")
    );
}

#[tokio::test]
async fn create_binds_content_to_course() {
    let course = math_course();
    let course_id = course.id();
    let mut contents = MockContentRepository::new();
    contents
        .expect_create()
        .withf(move |content| content.course_id() == course_id)
        .times(1)
        .return_once(|_| Ok(()));

    let created = service(contents, courses_with(Some(course)))
        .create(
            course_id,
            ContentDraft::new("Lesson", "Sets", Some(String::new())).expect("valid draft"),
        )
        .await
        .expect("create succeeds");

    assert_eq!(created.course_id(), course_id);
    assert_eq!(created.image_url(), None);
    assert_eq!(created.date_created(), fixture_timestamp());
}

#[tokio::test]
async fn list_reports_course_name_even_when_empty() {
    let course = math_course();
    let course_id = course.id();
    let mut contents = MockContentRepository::new();
    contents
        .expect_find_page()
        .withf(move |scope, predicate, _| *scope == course_id && predicate.is_unconstrained())
        .times(1)
        .return_once(|_, _, request| Ok(Page::new(Vec::new(), 0, request)));

    let listing = service(contents, courses_with(Some(course)))
        .list(course_id, FilterQuery::new(), PageRequest::default())
        .await
        .expect("list succeeds");

    assert_eq!(listing.course_name, "Math");
    assert_eq!(listing.page.total(), 0);
}

#[tokio::test]
async fn list_of_missing_course_is_not_found() {
    let mut contents = MockContentRepository::new();
    contents.expect_find_page().times(0);

    let error = service(contents, courses_with(None))
        .list(CourseId::random(), FilterQuery::new(), PageRequest::default())
        .await
        .expect_err("missing course");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn get_reports_missing_content() {
    let course = math_course();
    let course_id = course.id();
    let id = ContentId::random();
    let mut contents = MockContentRepository::new();
    contents
        .expect_find()
        .with(eq(course_id), eq(id))
        .times(1)
        .return_once(|_, _| Ok(None));

    let error = service(contents, courses_with(Some(course)))
        .get(course_id, id)
        .await
        .expect_err("missing content");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(
        error.message(),
        format!("Could not find content with matching id {id}")
    );
}

#[tokio::test]
async fn update_can_clear_image_url() {
    let course = math_course();
    let stored = lesson(course.id());
    let (course_id, id) = (course.id(), stored.id());
    let mut contents = MockContentRepository::new();
    contents
        .expect_find()
        .times(1)
        .return_once(move |_, _| Ok(Some(stored)));
    contents
        .expect_update()
        .withf(|content| content.image_url().is_none() && content.name() == "Lesson")
        .times(1)
        .return_once(|_| Ok(true));

    let updated = service(contents, courses_with(Some(course)))
        .update(
            course_id,
            id,
            ContentPatch {
                image_url: Some(None),
                ..ContentPatch::default()
            },
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.image_url(), None);
}

#[tokio::test]
async fn delete_returns_content_id() {
    let course = math_course();
    let stored = lesson(course.id());
    let (course_id, id) = (course.id(), stored.id());
    let mut contents = MockContentRepository::new();
    contents
        .expect_find()
        .times(1)
        .return_once(move |_, _| Ok(Some(stored)));
    contents
        .expect_delete()
        .with(eq(course_id), eq(id))
        .times(1)
        .return_once(|_, _| Ok(true));

    let removed = service(contents, courses_with(Some(course)))
        .delete(course_id, id)
        .await
        .expect("delete succeeds");

    assert_eq!(removed, id);
}

#[tokio::test]
async fn course_lookup_failure_is_service_unavailable() {
    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .return_once(|_| Err(CourseRepositoryError::connection("refused")));

    let error = service(MockContentRepository::new(), courses)
        .get(CourseId::random(), ContentId::random())
        .await
        .expect_err("connection failure");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
