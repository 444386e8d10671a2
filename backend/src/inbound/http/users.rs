//! User management endpoints.
//!
//! ```text
//! GET    /api/users?role=editor
//! GET    /api/users/{id}
//! POST   /api/users {"firstName":"Ada","lastName":"Lovelace","username":"ada","password":"s3cret"}
//! PUT    /api/users/{id} {"isActive":false}
//! DELETE /api/users/{id}
//! ```
//!
//! Listing, creation and deletion are admin only. Reading and updating are
//! open to the account itself; only admins may change `role` or `isActive`.
//! The user service enforces these rules against the [`Viewer`].
//!
//! [`Viewer`]: crate::domain::Viewer

use actix_web::{HttpResponse, delete, get, post, put, web};
use zeroize::Zeroizing;

use crate::domain::{Capability, Role, UserDraft, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_viewer;
use crate::inbound::http::dto::{
    CreateUserRequest, UpdateUserRequest, UserDto, UserListQuery, UserListResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, page_request, parse_id};

const ID: FieldName = FieldName::new("id");

/// Filtered, paginated account listing.
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users", body = UserListResponse),
        (status = 400, description = "Invalid filter or paging", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<UserListQuery>,
) -> ApiResult<web::Json<UserListResponse>> {
    let viewer = current_viewer(&state, &session).await?;
    let request = page_request(query.page, query.page_size)?;
    let page = state.users.list(&viewer, query.filter(), request).await?;
    let (users, count) = page.into_parts();
    Ok(web::Json(UserListResponse {
        users: users.iter().map(UserDto::from).collect(),
        count,
    }))
}

/// Single account.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserDto),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Neither admin nor the account itself", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserDto>> {
    let viewer = current_viewer(&state, &session).await?;
    let id: UserId = parse_id(&path, ID)?;
    let user = state.users.get(&viewer, id).await?;
    Ok(web::Json(UserDto::from(&user)))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = UserDto),
        (status = 400, description = "Invalid user", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let viewer = current_viewer(&state, &session).await?;
    viewer.authorize(Capability::ManageUsers)?;
    let CreateUserRequest {
        first_name,
        last_name,
        username,
        password,
        role,
    } = payload.into_inner();
    let draft = UserDraft::new(first_name, last_name, username, Zeroizing::new(password))?
        .with_role(role.map(Role::from).unwrap_or_default());
    let user = state.user_commands.create(&viewer, draft).await?;
    Ok(HttpResponse::Created().json(UserDto::from(&user)))
}

/// Update an account. Omitted fields keep their stored values.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserDto),
        (status = 400, description = "Invalid user", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not permitted to make this change", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserDto>> {
    let viewer = current_viewer(&state, &session).await?;
    let id: UserId = parse_id(&path, ID)?;
    let user = state
        .user_commands
        .update(&viewer, id, payload.into_inner().into())
        .await?;
    Ok(web::Json(UserDto::from(&user)))
}

/// Delete an account. Admins cannot delete themselves.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Id of the deleted user", body = String),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required, or own account", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<String>> {
    let viewer = current_viewer(&state, &session).await?;
    let id: UserId = parse_id(&path, ID)?;
    let deleted = state.user_commands.delete(&viewer, id).await?;
    Ok(web::Json(deleted.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{
        TEST_PASSWORD, api_app, call_json, login_cookie, memory_state, seed_user,
    };
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(Role::User, StatusCode::FORBIDDEN)]
    #[case(Role::Editor, StatusCode::FORBIDDEN)]
    #[case(Role::Admin, StatusCode::OK)]
    #[actix_web::test]
    async fn only_admins_list_users(#[case] role: Role, #[case] expected: StatusCode) {
        let (state, store) = memory_state();
        seed_user(&store, "viewer", role).await;
        let app = api_app(state).await;
        let cookie = login_cookie(&app, "viewer").await;

        let (status, _) = call_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/users")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(status, expected);
    }

    #[actix_web::test]
    async fn listing_filters_by_role() {
        let (state, store) = memory_state();
        seed_user(&store, "root", Role::Admin).await;
        seed_user(&store, "eddie", Role::Editor).await;
        seed_user(&store, "uma", Role::User).await;
        let app = api_app(state).await;
        let cookie = login_cookie(&app, "root").await;

        let (status, body) = call_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/users?role=edit")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], json!(1));
        assert_eq!(body["users"][0]["username"], json!("eddie"));
    }

    #[actix_web::test]
    async fn admin_creates_users_and_duplicates_conflict() {
        let (state, store) = memory_state();
        seed_user(&store, "root", Role::Admin).await;
        let app = api_app(state).await;
        let cookie = login_cookie(&app, "root").await;
        let body = json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "username": "grace",
            "password": "cobol",
            "role": "editor"
        });

        let (status, created) = call_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/users")
                .cookie(cookie.clone())
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["role"], json!("editor"));
        assert_eq!(created["isActive"], json!(true));
        assert!(created.get("password").is_none());

        let (status, conflict) = call_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/users")
                .cookie(cookie)
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(conflict["code"], json!("conflict"));
    }

    #[actix_web::test]
    async fn users_read_themselves_but_not_others() {
        let (state, store) = memory_state();
        let uma = seed_user(&store, "uma", Role::User).await;
        let other = seed_user(&store, "other", Role::User).await;
        let app = api_app(state).await;
        let cookie = login_cookie(&app, "uma").await;

        let (own, _) = call_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/users/{}", uma.id()))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        let (foreign, _) = call_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/users/{}", other.id()))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(own, StatusCode::OK);
        assert_eq!(foreign, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn self_service_cannot_escalate_privileges() {
        let (state, store) = memory_state();
        let uma = seed_user(&store, "uma", Role::User).await;
        let app = api_app(state).await;
        let cookie = login_cookie(&app, "uma").await;
        let uri = format!("/api/users/{}", uma.id());

        let (renamed, body) = call_json(
            &app,
            actix_test::TestRequest::put()
                .uri(&uri)
                .cookie(cookie.clone())
                .set_json(json!({"firstName": "Umaima"}))
                .to_request(),
        )
        .await;
        let (escalated, _) = call_json(
            &app,
            actix_test::TestRequest::put()
                .uri(&uri)
                .cookie(cookie)
                .set_json(json!({"role": "admin"}))
                .to_request(),
        )
        .await;

        assert_eq!(renamed, StatusCode::OK);
        assert_eq!(body["firstName"], json!("Umaima"));
        assert_eq!(escalated, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn password_changes_apply_to_the_next_login() {
        let (state, store) = memory_state();
        let uma = seed_user(&store, "uma", Role::User).await;
        let app = api_app(state).await;
        let cookie = login_cookie(&app, "uma").await;

        let (status, _) = call_json(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/users/{}", uma.id()))
                .cookie(cookie)
                .set_json(json!({"password": "new secret"}))
                .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (old, _) = call_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"username": "uma", "password": TEST_PASSWORD}))
                .to_request(),
        )
        .await;
        let (new, _) = call_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"username": "uma", "password": "new secret"}))
                .to_request(),
        )
        .await;
        assert_eq!(old, StatusCode::UNAUTHORIZED);
        assert_eq!(new, StatusCode::OK);
    }

    #[actix_web::test]
    async fn admins_delete_others_but_not_themselves() {
        let (state, store) = memory_state();
        let root = seed_user(&store, "root", Role::Admin).await;
        let uma = seed_user(&store, "uma", Role::User).await;
        let app = api_app(state).await;
        let cookie = login_cookie(&app, "root").await;

        let (status, deleted) = call_json(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/users/{}", uma.id()))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted, Value::String(uma.id().to_string()));

        let (status, _) = call_json(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/users/{}", root.id()))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
