//! Content endpoints, nested under their owning course.
//!
//! ```text
//! GET    /api/courses/{courseId}/contents?name=eq
//! GET    /api/courses/{courseId}/contents/{id}
//! POST   /api/courses/{courseId}/contents {"name":"Linear","description":"x"}
//! PUT    /api/courses/{courseId}/contents/{id} {"imageUrl":null}
//! DELETE /api/courses/{courseId}/contents/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{Capability, ContentDraft, ContentId, CourseId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_viewer;
use crate::inbound::http::dto::{
    CatalogueListQuery, ContentDto, ContentListResponse, CreateContentRequest,
    UpdateContentRequest,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, page_request, parse_id};

const COURSE_ID: FieldName = FieldName::new("courseId");
const ID: FieldName = FieldName::new("id");

fn content_path(path: &(String, String)) -> Result<(CourseId, ContentId), Error> {
    let (course_id, id) = path;
    Ok((parse_id(course_id, COURSE_ID)?, parse_id(id, ID)?))
}

/// Filtered, paginated contents of one course.
#[utoipa::path(
    get,
    path = "/api/courses/{courseId}/contents",
    params(
        ("courseId" = String, Path, description = "Course id"),
        CatalogueListQuery
    ),
    responses(
        (status = 200, description = "Contents", body = ContentListResponse),
        (status = 400, description = "Invalid filter or paging", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such course", body = ErrorSchema)
    ),
    tags = ["contents"],
    operation_id = "listContents"
)]
#[get("/courses/{course_id}/contents")]
pub async fn list_contents(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<CatalogueListQuery>,
) -> ApiResult<web::Json<ContentListResponse>> {
    let viewer = current_viewer(&state, &session).await?;
    viewer.authorize(Capability::BrowseCatalogue)?;
    let course_id: CourseId = parse_id(&path, COURSE_ID)?;
    let request = page_request(query.page, query.page_size)?;
    let listing = state
        .contents
        .list(course_id, query.content_filter(), request)
        .await?;
    let (contents, count) = listing.page.into_parts();
    Ok(web::Json(ContentListResponse {
        contents: contents.iter().map(ContentDto::from).collect(),
        count,
        course_name: listing.course_name,
    }))
}

/// Single content item.
#[utoipa::path(
    get,
    path = "/api/courses/{courseId}/contents/{id}",
    params(
        ("courseId" = String, Path, description = "Course id"),
        ("id" = String, Path, description = "Content id")
    ),
    responses(
        (status = 200, description = "Content", body = ContentDto),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such content in this course", body = ErrorSchema)
    ),
    tags = ["contents"],
    operation_id = "getContent"
)]
#[get("/courses/{course_id}/contents/{id}")]
pub async fn get_content(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<ContentDto>> {
    let viewer = current_viewer(&state, &session).await?;
    viewer.authorize(Capability::BrowseCatalogue)?;
    let (course_id, id) = content_path(&path)?;
    let content = state.contents.get(course_id, id).await?;
    Ok(web::Json(ContentDto::from(&content)))
}

/// Add a content item to a course.
#[utoipa::path(
    post,
    path = "/api/courses/{courseId}/contents",
    params(("courseId" = String, Path, description = "Course id")),
    request_body = CreateContentRequest,
    responses(
        (status = 201, description = "Created", body = ContentDto),
        (status = 400, description = "Invalid content", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Editor or admin role required", body = ErrorSchema),
        (status = 404, description = "No such course", body = ErrorSchema)
    ),
    tags = ["contents"],
    operation_id = "createContent"
)]
#[post("/courses/{course_id}/contents")]
pub async fn create_content(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreateContentRequest>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    viewer.authorize(Capability::EditCatalogue)?;
    let course_id: CourseId = parse_id(&path, COURSE_ID)?;
    let CreateContentRequest {
        name,
        description,
        image_url,
    } = payload.into_inner();
    let draft = ContentDraft::new(name, description, image_url)?;
    let content = state.content_commands.create(course_id, draft).await?;
    Ok(HttpResponse::Created().json(ContentDto::from(&content)))
}

/// Update a content item. `imageUrl: null` clears the image.
#[utoipa::path(
    put,
    path = "/api/courses/{courseId}/contents/{id}",
    params(
        ("courseId" = String, Path, description = "Course id"),
        ("id" = String, Path, description = "Content id")
    ),
    request_body = UpdateContentRequest,
    responses(
        (status = 200, description = "Updated", body = ContentDto),
        (status = 400, description = "Invalid content", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Editor or admin role required", body = ErrorSchema),
        (status = 404, description = "No such content in this course", body = ErrorSchema)
    ),
    tags = ["contents"],
    operation_id = "updateContent"
)]
#[put("/courses/{course_id}/contents/{id}")]
pub async fn update_content(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateContentRequest>,
) -> ApiResult<web::Json<ContentDto>> {
    let viewer = current_viewer(&state, &session).await?;
    viewer.authorize(Capability::EditCatalogue)?;
    let (course_id, id) = content_path(&path)?;
    let content = state
        .content_commands
        .update(course_id, id, payload.into_inner().into())
        .await?;
    Ok(web::Json(ContentDto::from(&content)))
}

/// Remove a content item.
#[utoipa::path(
    delete,
    path = "/api/courses/{courseId}/contents/{id}",
    params(
        ("courseId" = String, Path, description = "Course id"),
        ("id" = String, Path, description = "Content id")
    ),
    responses(
        (status = 200, description = "Id of the deleted content", body = String),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "No such content in this course", body = ErrorSchema)
    ),
    tags = ["contents"],
    operation_id = "deleteContent"
)]
#[delete("/courses/{course_id}/contents/{id}")]
pub async fn delete_content(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<String>> {
    let viewer = current_viewer(&state, &session).await?;
    viewer.authorize(Capability::DeleteCatalogue)?;
    let (course_id, id) = content_path(&path)?;
    let deleted = state.content_commands.delete(course_id, id).await?;
    Ok(web::Json(deleted.to_string()))
}
