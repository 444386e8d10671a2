//! Shared harness for HTTP integration tests over the in-memory store.
#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use argon2::Params;
use mockable::DefaultClock;
use serde_json::{Value, json};
use zeroize::Zeroizing;

use course_admin::Trace;
use course_admin::domain::UserService;
use course_admin::inbound::http::configure_api;
use course_admin::inbound::http::session::SESSION_COOKIE_NAME;
use course_admin::inbound::http::state::HttpState;
use course_admin::outbound::memory::InMemoryStore;
use course_admin::outbound::security::Argon2PasswordHasher;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password";

pub type Request = actix_http::Request;

/// Full application service with a bootstrapped admin account.
pub async fn admin_app()
-> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let store = Arc::new(InMemoryStore::new());
    let params = Params::new(8, 1, 1, None).expect("valid argon2 params");
    let hasher = Arc::new(Argon2PasswordHasher::with_params(params));
    UserService::new(store.clone(), hasher.clone(), Arc::new(DefaultClock))
        .bootstrap_admin(ADMIN_USERNAME, Zeroizing::new(ADMIN_PASSWORD.to_owned()))
        .await
        .expect("bootstrap admin")
        .expect("store starts empty");
    let state = HttpState::from_repositories(
        store.clone(),
        store.clone(),
        store,
        hasher,
        Arc::new(DefaultClock),
    );
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build();
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(web::scope("/api").wrap(session).configure(configure_api)),
    )
    .await
}

/// Send a request and decode the body as JSON (`Value::Null` when empty).
pub async fn send<S>(app: &S, request: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, request).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&body).expect("JSON body"))
}

/// Log in and return the session cookie, or the failing status.
pub async fn try_login<S>(
    app: &S,
    username: &str,
    password: &str,
) -> Result<Cookie<'static>, StatusCode>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    if !response.status().is_success() {
        return Err(response.status());
    }
    Ok(response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("session cookie"))
}

/// Log in as the bootstrapped admin.
pub async fn login_admin<S>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    try_login(app, ADMIN_USERNAME, ADMIN_PASSWORD)
        .await
        .expect("admin login")
}

/// Create an account through the API and return its id.
pub async fn create_user<S>(
    app: &S,
    admin: &Cookie<'static>,
    username: &str,
    password: &str,
    role: &str,
) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(admin.clone())
            .set_json(json!({
                "firstName": "Test",
                "lastName": "User",
                "username": username,
                "password": password,
                "role": role
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create user: {body}");
    body["id"].as_str().expect("user id").to_owned()
}

/// Create a course through the API and return its id.
pub async fn create_course<S>(
    app: &S,
    cookie: &Cookie<'static>,
    name: &str,
    description: &str,
) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/courses")
            .cookie(cookie.clone())
            .set_json(json!({ "name": name, "description": description }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create course: {body}");
    body["id"].as_str().expect("course id").to_owned()
}

/// Create a content item through the API and return its id.
pub async fn create_content<S>(
    app: &S,
    cookie: &Cookie<'static>,
    course_id: &str,
    name: &str,
    description: &str,
) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/courses/{course_id}/contents"))
            .cookie(cookie.clone())
            .set_json(json!({ "name": name, "description": description }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create content: {body}");
    body["id"].as_str().expect("content id").to_owned()
}

/// `GET` with the session cookie.
pub fn get(uri: &str, cookie: &Cookie<'static>) -> Request {
    actix_test::TestRequest::get()
        .uri(uri)
        .cookie(cookie.clone())
        .to_request()
}
