//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Courses offered in the catalogue.
    courses (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Text,
        /// Free-form description.
        description -> Text,
        /// Creation timestamp, never updated.
        date_created -> Timestamptz,
    }
}

diesel::table! {
    /// Lessons and resources nested under a course.
    contents (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning course; rows are removed with their course.
        course_id -> Uuid,
        /// Display name.
        name -> Text,
        /// Free-form description.
        description -> Text,
        /// Optional illustration URL.
        image_url -> Nullable<Text>,
        /// Creation timestamp, never updated.
        date_created -> Timestamptz,
    }
}

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Given name.
        first_name -> Text,
        /// Family name.
        last_name -> Text,
        /// Unique login name.
        username -> Text,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// One of `user`, `editor` or `admin`.
        role -> Text,
        /// Whether the account may sign in.
        is_active -> Bool,
        /// Creation timestamp, never updated.
        date_created -> Timestamptz,
    }
}

diesel::joinable!(contents -> courses (course_id));
diesel::allow_tables_to_appear_in_same_query!(courses, contents, users);
