//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use argon2::Params;
use mockable::DefaultClock;
use serde_json::{Value, json};

use crate::domain::ports::{PasswordHasher, UserRepository};
use crate::domain::{Role, User, UserDraft, UserId};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::Argon2PasswordHasher;

use super::configure_api;
use super::session::SESSION_COOKIE_NAME;

/// Password given to every seeded account.
pub const TEST_PASSWORD: &str = "correct horse";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Disables the `Secure` flag for local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// Argon2 with minimal cost so tests hash quickly.
pub fn cheap_hasher() -> Arc<Argon2PasswordHasher> {
    let params = Params::new(8, 1, 1, None).expect("valid argon2 params");
    Arc::new(Argon2PasswordHasher::with_params(params))
}

/// HTTP state wired over a fresh in-memory store.
pub fn memory_state() -> (web::Data<HttpState>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let state = HttpState::from_repositories(
        store.clone(),
        store.clone(),
        store.clone(),
        cheap_hasher(),
        Arc::new(DefaultClock),
    );
    (web::Data::new(state), store)
}

/// Insert an account directly into the store with [`TEST_PASSWORD`].
pub async fn seed_user(store: &InMemoryStore, username: &str, role: Role) -> User {
    let draft = UserDraft::new(
        "Test",
        "User",
        username,
        zeroize::Zeroizing::new(TEST_PASSWORD.to_owned()),
    )
    .expect("valid draft")
    .with_role(role);
    let hash = cheap_hasher().hash(TEST_PASSWORD).expect("hash");
    let user = User::new(UserId::random(), draft, chrono::Utc::now());
    UserRepository::create(store, &user, &hash)
        .await
        .expect("seed user");
    user
}

/// Log in through `POST /api/auth/login` and return the session cookie.
pub async fn login_cookie<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": username, "password": TEST_PASSWORD }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Initialise the full `/api` scope behind a test session middleware.
pub async fn api_app(
    state: web::Data<HttpState>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .service(web::scope("/api").configure(configure_api)),
    )
    .await
}

/// Send a request and decode the body as JSON (`Value::Null` when empty).
pub async fn call_json<S>(app: &S, request: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, request).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    let value = serde_json::from_slice(&body).expect("JSON body");
    (status, value)
}
