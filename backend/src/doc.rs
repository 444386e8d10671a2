//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler, the request and response DTOs,
//! the error schemas and the session cookie security scheme. The document
//! backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::dto::{
    ContentDto, ContentListResponse, CourseDto, CourseListResponse, CourseWithCountDto,
    CreateContentRequest, CreateCourseRequest, CreateUserRequest, LoginRequest, RoleDto,
    StatsResponse, UpdateContentRequest, UpdateCourseRequest, UpdateUserRequest, UserDto,
    UserListResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Course admin API",
        description = "Session-authenticated administration of courses, their contents and user accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::courses::get_course,
        crate::inbound::http::courses::create_course,
        crate::inbound::http::courses::update_course,
        crate::inbound::http::courses::delete_course,
        crate::inbound::http::contents::list_contents,
        crate::inbound::http::contents::get_content,
        crate::inbound::http::contents::create_content,
        crate::inbound::http::contents::update_content,
        crate::inbound::http::contents::delete_content,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::stats::get_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RoleDto,
        CourseDto,
        CourseWithCountDto,
        ContentDto,
        UserDto,
        LoginRequest,
        CreateCourseRequest,
        UpdateCourseRequest,
        CreateContentRequest,
        UpdateContentRequest,
        CreateUserRequest,
        UpdateUserRequest,
        CourseListResponse,
        ContentListResponse,
        UserListResponse,
        StatsResponse
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "courses", description = "Course catalogue"),
        (name = "contents", description = "Content items within a course"),
        (name = "users", description = "Account administration"),
        (name = "stats", description = "Dashboard summary"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
