//! Domain primitives, aggregates and services.
//!
//! Purpose: define the catalogue entities (courses and their contents), user
//! accounts, the shared filter and error vocabulary, and the services that
//! implement the driving ports. Nothing here depends on HTTP or Diesel.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Course, Content, User: aggregates with their drafts and patches.
//! - FilterQuery, Predicate, build_predicate: list filtering.
//! - CourseService, ContentService, UserService, StatsService: use-cases.

pub mod auth;
pub mod content;
mod content_service;
pub mod course;
mod course_service;
pub mod error;
pub mod filter;
pub mod ids;
pub mod ports;
mod service_support;
mod stats_service;
#[cfg(test)]
pub(crate) mod test_clock;
mod text;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::auth::{
    Capability, LoginCredentials, LoginValidationError, PasswordHash, Viewer,
};
pub use self::content::{
    Content, ContentDraft, ContentField, ContentPatch, ContentValidationError,
};
pub use self::content_service::ContentService;
pub use self::course::{
    Course, CourseContentCount, CourseDraft, CourseField, CoursePatch, CourseValidationError,
    rank_by_content_count,
};
pub use self::course_service::CourseService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::filter::{
    Condition, FieldSpec, FilterError, FilterField, FilterQuery, Filterable, MatchKind,
    Predicate, build_predicate,
};
pub use self::ids::{ContentId, CourseId, InvalidIdError, UserId};
pub use self::stats_service::StatsService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Role, UnknownRoleError, User, UserDraft, UserField, UserPatch, UserValidationError,
};
pub use self::user_service::UserService;

/// Number of rows shown in the dashboard's "latest" lists.
pub const LATEST_LIMIT: usize = 5;

/// Number of courses shown in the dashboard's content ranking.
pub const TOP_COURSES_LIMIT: usize = 5;
