//! Course endpoints.
//!
//! ```text
//! GET    /api/courses?name=math&page=1&pageSize=10
//! GET    /api/courses/{id}
//! POST   /api/courses {"name":"Math","description":"Algebra"}
//! PUT    /api/courses/{id} {"description":"Geometry"}
//! DELETE /api/courses/{id}
//! ```
//!
//! Reads need an authenticated account; writes need the editor or admin
//! role.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{Capability, CourseDraft, CourseId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_viewer;
use crate::inbound::http::dto::{
    CatalogueListQuery, CourseDto, CourseListResponse, CreateCourseRequest, UpdateCourseRequest,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, page_request, parse_id};

const ID: FieldName = FieldName::new("id");

/// Filtered, paginated course listing.
#[utoipa::path(
    get,
    path = "/api/courses",
    params(CatalogueListQuery),
    responses(
        (status = 200, description = "Courses", body = CourseListResponse),
        (status = 400, description = "Invalid filter or paging", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "listCourses"
)]
#[get("/courses")]
pub async fn list_courses(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CatalogueListQuery>,
) -> ApiResult<web::Json<CourseListResponse>> {
    let viewer = current_viewer(&state, &session).await?;
    viewer.authorize(Capability::BrowseCatalogue)?;
    let request = page_request(query.page, query.page_size)?;
    let page = state.courses.list(query.course_filter(), request).await?;
    let (courses, count) = page.into_parts();
    Ok(web::Json(CourseListResponse {
        courses: courses.iter().map(CourseDto::from).collect(),
        count,
    }))
}

/// Single course.
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course", body = CourseDto),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such course", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "getCourse"
)]
#[get("/courses/{id}")]
pub async fn get_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CourseDto>> {
    let viewer = current_viewer(&state, &session).await?;
    viewer.authorize(Capability::BrowseCatalogue)?;
    let id: CourseId = parse_id(&path, ID)?;
    let course = state.courses.get(id).await?;
    Ok(web::Json(CourseDto::from(&course)))
}

/// Create a course.
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Created", body = CourseDto),
        (status = 400, description = "Invalid course", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Editor or admin role required", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "createCourse"
)]
#[post("/courses")]
pub async fn create_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateCourseRequest>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    viewer.authorize(Capability::EditCatalogue)?;
    let CreateCourseRequest { name, description } = payload.into_inner();
    let course = state
        .course_commands
        .create(CourseDraft::new(name, description)?)
        .await?;
    Ok(HttpResponse::Created().json(CourseDto::from(&course)))
}

/// Update a course. Omitted fields keep their stored values.
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Updated", body = CourseDto),
        (status = 400, description = "Invalid course", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Editor or admin role required", body = ErrorSchema),
        (status = 404, description = "No such course", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "updateCourse"
)]
#[put("/courses/{id}")]
pub async fn update_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateCourseRequest>,
) -> ApiResult<web::Json<CourseDto>> {
    let viewer = current_viewer(&state, &session).await?;
    viewer.authorize(Capability::EditCatalogue)?;
    let id: CourseId = parse_id(&path, ID)?;
    let course = state
        .course_commands
        .update(id, payload.into_inner().into())
        .await?;
    Ok(web::Json(CourseDto::from(&course)))
}

/// Delete a course and its contents.
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Id of the deleted course", body = String),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "No such course", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "deleteCourse"
)]
#[delete("/courses/{id}")]
pub async fn delete_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<String>> {
    let viewer = current_viewer(&state, &session).await?;
    viewer.authorize(Capability::DeleteCatalogue)?;
    let id: CourseId = parse_id(&path, ID)?;
    let deleted = state.course_commands.delete(id).await?;
    Ok(web::Json(deleted.to_string()))
}
