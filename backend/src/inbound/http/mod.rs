//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod contents;
pub mod courses;
pub mod dto;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register the REST handlers and extractor configuration.
///
/// Mount inside the `/api` scope, behind the session middleware.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use course_admin::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(courses::list_courses)
        .service(courses::create_course)
        .service(courses::get_course)
        .service(courses::update_course)
        .service(courses::delete_course)
        .service(contents::list_contents)
        .service(contents::create_content)
        .service(contents::get_content)
        .service(contents::update_content)
        .service(contents::delete_content)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(stats::get_stats);
}
