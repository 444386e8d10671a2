//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports, backed by PostgreSQL via
//! `diesel-async` with `bb8` pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leak into the domain.
//! - **Typed errors**: Diesel and pool failures map onto each port's error
//!   enum.
//!
//! # Example
//!
//! ```no_run
//! use course_admin::outbound::persistence::{DbPool, DieselCourseRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), course_admin::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/courses")).await?;
//! let courses = DieselCourseRepository::new(pool);
//! # let _ = courses;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_content_repository;
mod diesel_course_repository;
mod diesel_query_helpers;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_content_repository::DieselContentRepository;
pub use diesel_course_repository::DieselCourseRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
