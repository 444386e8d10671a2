//! Authentication endpoints and the viewer lookup used by every guarded
//! handler.
//!
//! ```text
//! POST /api/auth/login {"username":"admin","password":"password"}
//! POST /api/auth/logout
//! GET  /api/auth/me
//! ```
//!
//! The session stores only a user id. [`current_user`] reloads the account
//! on each request, so deactivation and role changes apply immediately.

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{ErrorCode, LoginCredentials, User, Viewer};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{LoginRequest, UserDto};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the account behind the session.
///
/// Stale sessions (deleted or deactivated accounts) are purged so the
/// client receives an expired cookie alongside the `401`.
pub async fn current_user(state: &HttpState, session: &SessionContext) -> ApiResult<User> {
    let id = session.require_user_id()?;
    state.login.resolve_session(id).await.inspect_err(|err| {
        if err.code() == ErrorCode::Unauthorized {
            session.clear();
        }
    })
}

/// Resolve the [`Viewer`] acting on this request.
pub async fn current_viewer(state: &HttpState, session: &SessionContext) -> ApiResult<Viewer> {
    current_user(state, session)
        .await
        .map(|user| Viewer::from_user(&user))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserDto,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials or inactive account", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserDto>> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&username, &password)?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(UserDto::from(&user)))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().finish()
}

/// The authenticated account.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserDto>> {
    let user = current_user(&state, &session).await?;
    Ok(web::Json(UserDto::from(&user)))
}
