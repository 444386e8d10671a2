//! Request and response bodies for the REST API.
//!
//! Domain types stay free of serde and utoipa; these DTOs carry the camelCase
//! wire shape and the OpenAPI schemas. Passwords only ever appear in request
//! bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::DashboardStats;
use crate::domain::{
    Content, ContentField, ContentPatch, Course, CourseContentCount, CourseField, CoursePatch,
    FilterQuery, Role, User, UserField, UserPatch,
};

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Account role on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleDto {
    /// Read-only access to the catalogue.
    User,
    /// May edit courses and contents.
    Editor,
    /// Full access including user management.
    Admin,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Editor => Self::Editor,
            Role::Admin => Self::Admin,
        }
    }
}

impl From<RoleDto> for Role {
    fn from(role: RoleDto) -> Self {
        match role {
            RoleDto::User => Self::User,
            RoleDto::Editor => Self::Editor,
            RoleDto::Admin => Self::Admin,
        }
    }
}

/// Course as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: Uuid,
    #[schema(example = "Math")]
    pub name: String,
    #[schema(example = "Algebra")]
    pub description: String,
    pub date_created: DateTime<Utc>,
}

impl From<&Course> for CourseDto {
    fn from(course: &Course) -> Self {
        Self {
            id: *course.id().as_uuid(),
            name: course.name().to_owned(),
            description: course.description().to_owned(),
            date_created: course.date_created(),
        }
    }
}

/// Course plus the number of contents it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithCountDto {
    #[serde(flatten)]
    pub course: CourseDto,
    pub content_count: u64,
}

impl From<&CourseContentCount> for CourseWithCountDto {
    fn from(entry: &CourseContentCount) -> Self {
        Self {
            course: CourseDto::from(&entry.course),
            content_count: entry.content_count,
        }
    }
}

/// Content item as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentDto {
    pub id: Uuid,
    pub course_id: Uuid,
    #[schema(example = "Linear equations")]
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub date_created: DateTime<Utc>,
}

impl From<&Content> for ContentDto {
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

/// User account as returned by the API. Never includes the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "ada")]
    pub username: String,
    pub role: RoleDto,
    pub is_active: bool,
    pub date_created: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            username: user.username().to_owned(),
            role: user.role().into(),
            is_active: user.is_active(),
            date_created: user.date_created(),
        }
    }
}

/// Login request body for `POST /api/auth/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body for `POST /api/courses`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub name: String,
    pub description: String,
}

/// Body for `PUT /api/courses/{id}`; omitted fields keep their values.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateCourseRequest> for CoursePatch {
    fn from(body: UpdateCourseRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
        }
    }
}

/// Body for `POST /api/courses/{courseId}/contents`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Body for `PUT /api/courses/{courseId}/contents/{id}`.
///
/// `imageUrl: null` clears the image; omitting it keeps the stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub image_url: Option<Option<String>>,
}

impl From<UpdateContentRequest> for ContentPatch {
    fn from(body: UpdateContentRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            image_url: body.image_url,
        }
    }
}

/// Body for `POST /api/users`. The role defaults to `user`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<RoleDto>,
}

/// Body for `PUT /api/users/{id}`; omitted fields keep their values.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<RoleDto>,
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(body: UpdateUserRequest) -> Self {
        Self {
            first_name: body.first_name,
            last_name: body.last_name,
            username: body.username,
            password: body.password.map(Zeroizing::new),
            role: body.role.map(Role::from),
            is_active: body.is_active,
        }
    }
}

/// Filter and paging parameters shared by course and content listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CatalogueListQuery {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Case-insensitive substring of the description.
    pub description: Option<String>,
    /// Only rows created strictly after this RFC 3339 instant or date.
    pub date_created: Option<String>,
    /// 1-indexed page number.
    pub page: Option<i64>,
    /// Rows per page, at most 100.
    pub page_size: Option<i64>,
}

impl CatalogueListQuery {
    /// Filter over courses.
    pub fn course_filter(&self) -> FilterQuery<CourseField> {
        FilterQuery::new()
            .with_optional(CourseField::Name, self.name.clone())
            .with_optional(CourseField::Description, self.description.clone())
            .with_optional(CourseField::DateCreated, self.date_created.clone())
    }

    /// Filter over contents.
    pub fn content_filter(&self) -> FilterQuery<ContentField> {
        FilterQuery::new()
            .with_optional(ContentField::Name, self.name.clone())
            .with_optional(ContentField::Description, self.description.clone())
            .with_optional(ContentField::DateCreated, self.date_created.clone())
    }
}

/// Filter and paging parameters for the user listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Case-insensitive substring of the first name.
    pub first_name: Option<String>,
    /// Case-insensitive substring of the last name.
    pub last_name: Option<String>,
    /// Case-insensitive substring of the username.
    pub username: Option<String>,
    /// Case-insensitive substring of the role.
    pub role: Option<String>,
    /// 1-indexed page number.
    pub page: Option<i64>,
    /// Rows per page, at most 100.
    pub page_size: Option<i64>,
}

impl UserListQuery {
    /// Filter over users.
    pub fn filter(&self) -> FilterQuery<UserField> {
        FilterQuery::new()
            .with_optional(UserField::FirstName, self.first_name.clone())
            .with_optional(UserField::LastName, self.last_name.clone())
            .with_optional(UserField::Username, self.username.clone())
            .with_optional(UserField::Role, self.role.clone())
    }
}

/// `GET /api/courses` response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseListResponse {
    pub courses: Vec<CourseDto>,
    /// Matches across all pages.
    pub count: u64,
}

/// `GET /api/courses/{courseId}/contents` response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentListResponse {
    pub contents: Vec<ContentDto>,
    /// Matches across all pages.
    pub count: u64,
    pub course_name: String,
}

/// `GET /api/users` response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserDto>,
    /// Matches across all pages.
    pub count: u64,
}

/// `GET /api/stats` response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub number_of_users: u64,
    pub number_of_courses: u64,
    pub number_of_contents: u64,
    /// Empty unless the caller is an admin.
    pub latest_users: Vec<UserDto>,
    pub latest_courses: Vec<CourseDto>,
    pub courses_more_contents: Vec<CourseWithCountDto>,
}

impl From<&DashboardStats> for StatsResponse {
    fn from(stats: &DashboardStats) -> Self {
        Self {
            number_of_users: stats.number_of_users,
            number_of_courses: stats.number_of_courses,
            number_of_contents: stats.number_of_contents,
            latest_users: stats.latest_users.iter().map(UserDto::from).collect(),
            latest_courses: stats.latest_courses.iter().map(CourseDto::from).collect(),
            courses_more_contents: stats
                .courses_more_contents
                .iter()
                .map(CourseWithCountDto::from)
                .collect(),
        }
    }
}
