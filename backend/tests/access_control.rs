//! Role checks and session lifecycle through the public API.

mod support;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::json;

use support::{admin_app, create_course, create_user, get, login_admin, send, try_login};

#[rstest]
#[case("user", StatusCode::FORBIDDEN)]
#[case("editor", StatusCode::FORBIDDEN)]
#[case("admin", StatusCode::OK)]
#[actix_web::test]
async fn only_admins_list_accounts(#[case] role: &str, #[case] expected: StatusCode) {
    let app = admin_app().await;
    let admin = login_admin(&app).await;
    create_user(&app, &admin, "grace", "hopper-pass", role).await;
    let cookie = try_login(&app, "grace", "hopper-pass")
        .await
        .expect("login");

    let (status, body) = send(&app, get("/api/users", &cookie)).await;

    assert_eq!(status, expected);
    if expected == StatusCode::FORBIDDEN {
        assert_eq!(body["code"], json!("forbidden"));
    }
}

#[rstest]
#[actix_web::test]
async fn editors_see_counts_but_not_latest_users() {
    let app = admin_app().await;
    let admin = login_admin(&app).await;
    create_user(&app, &admin, "edith", "editor-pass", "editor").await;
    let editor = try_login(&app, "edith", "editor-pass")
        .await
        .expect("login");
    create_course(&app, &editor, "Chemistry", "Reactions").await;

    let (status, body) = send(&app, get("/api/stats", &editor)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["numberOfUsers"], json!(2));
    assert_eq!(body["latestUsers"], json!([]));
    assert_eq!(body["latestCourses"][0]["name"], json!("Chemistry"));
}

#[rstest]
#[actix_web::test]
async fn plain_users_read_but_cannot_edit_the_catalogue() {
    let app = admin_app().await;
    let admin = login_admin(&app).await;
    let course = create_course(&app, &admin, "Physics", "Forces").await;
    create_user(&app, &admin, "reader", "reader-pass", "user").await;
    let reader = try_login(&app, "reader", "reader-pass")
        .await
        .expect("login");

    let (status, _) = send(&app, get(&format!("/api/courses/{course}"), &reader)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/courses/{course}"))
            .cookie(reader.clone())
            .set_json(json!({ "name": "Renamed" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], json!("forbidden"));
}

#[rstest]
#[actix_web::test]
async fn editors_edit_but_only_admins_delete_courses() {
    let app = admin_app().await;
    let admin = login_admin(&app).await;
    create_user(&app, &admin, "edith", "editor-pass", "editor").await;
    let editor = try_login(&app, "edith", "editor-pass")
        .await
        .expect("login");
    let course = create_course(&app, &editor, "Geology", "Rocks").await;
    let delete = |cookie: &actix_web::cookie::Cookie<'static>| {
        actix_test::TestRequest::delete()
            .uri(&format!("/api/courses/{course}"))
            .cookie(cookie.clone())
            .to_request()
    };

    let (status, body) = send(&app, delete(&editor)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], json!("forbidden"));

    let (status, body) = send(&app, delete(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(course));
}

#[rstest]
#[actix_web::test]
async fn deactivation_blocks_login_and_revokes_live_sessions() {
    let app = admin_app().await;
    let admin = login_admin(&app).await;
    let id = create_user(&app, &admin, "leaver", "leaver-pass", "user").await;
    let live = try_login(&app, "leaver", "leaver-pass")
        .await
        .expect("login");

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/users/{id}"))
            .cookie(admin.clone())
            .set_json(json!({ "isActive": false }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isActive"], json!(false));

    let (status, body) = send(&app, get("/api/auth/me", &live)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("unauthorized"));

    let rejected = try_login(&app, "leaver", "leaver-pass").await;
    assert_eq!(rejected.err(), Some(StatusCode::UNAUTHORIZED));
}

#[rstest]
#[actix_web::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let app = admin_app().await;

    let wrong = try_login(&app, support::ADMIN_USERNAME, "not-the-password").await;
    let unknown = try_login(&app, "nobody", "whatever").await;

    assert_eq!(wrong.err(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(unknown.err(), Some(StatusCode::UNAUTHORIZED));
}

#[rstest]
#[actix_web::test]
async fn logged_out_cookie_no_longer_authenticates() {
    let app = admin_app().await;
    let admin = login_admin(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/logout")
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == course_admin::inbound::http::session::SESSION_COOKIE_NAME)
        .map(actix_web::cookie::Cookie::into_owned)
        .expect("removal cookie");

    let (status, _) = send(&app, get("/api/courses", &cleared)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn error_bodies_echo_the_trace_header() {
    let app = admin_app().await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/courses").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let header = response
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let body: serde_json::Value = actix_test::read_body_json(response).await;
    assert_eq!(body["traceId"], json!(header));
}
