//! Dashboard summary endpoint.

use actix_web::{get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_viewer;
use crate::inbound::http::dto::StatsResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Counts, newest rows and the content ranking. `latestUsers` is empty for
/// non-admins.
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Dashboard summary", body = StatsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "getStats"
)]
#[get("/stats")]
pub async fn get_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<StatsResponse>> {
    let viewer = current_viewer(&state, &session).await?;
    let stats = state.stats.stats(&viewer).await?;
    Ok(web::Json(StatsResponse::from(&stats)))
}

#[cfg(test)]
mod tests {
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{
        api_app, call_json, login_cookie, memory_state, seed_user,
    };
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Role::Admin, 2)]
    #[case(Role::Editor, 0)]
    #[case(Role::User, 0)]
    #[actix_web::test]
    async fn latest_users_are_admin_only(#[case] role: Role, #[case] visible: usize) {
        let (state, store) = memory_state();
        seed_user(&store, "viewer", role).await;
        seed_user(&store, "other", Role::User).await;
        let app = api_app(state).await;
        let cookie = login_cookie(&app, "viewer").await;

        let (status, body) = call_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/stats")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["numberOfUsers"], json!(2));
        let latest = body["latestUsers"].as_array().expect("latestUsers array");
        assert_eq!(latest.len(), visible);
    }

    #[actix_web::test]
    async fn ranking_counts_contents_per_course() {
        let (state, store) = memory_state();
        seed_user(&store, "eddie", Role::Editor).await;
        let app = api_app(state).await;
        let cookie = login_cookie(&app, "eddie").await;
        let (_, course) = call_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/courses")
                .cookie(cookie.clone())
                .set_json(json!({"name": "Math", "description": "Algebra"}))
                .to_request(),
        )
        .await;
        let course_id = course["id"].as_str().expect("id").to_owned();
        for name in ["Linear", "Quadratic"] {
            call_json(
                &app,
                actix_test::TestRequest::post()
                    .uri(&format!("/api/courses/{course_id}/contents"))
                    .cookie(cookie.clone())
                    .set_json(json!({"name": name, "description": "x"}))
                    .to_request(),
            )
            .await;
        }

        let (_, body) = call_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/stats")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(body["numberOfCourses"], json!(1));
        assert_eq!(body["numberOfContents"], json!(2));
        assert_eq!(body["latestCourses"][0]["name"], json!("Math"));
        assert_eq!(body["coursesMoreContents"][0]["contentCount"], json!(2));
        assert_eq!(body["coursesMoreContents"][0]["name"], json!("Math"));
    }

    #[actix_web::test]
    async fn stats_require_a_session() {
        let (state, _) = memory_state();
        let app = api_app(state).await;

        let (status, _) = call_json(
            &app,
            actix_test::TestRequest::get().uri("/api/stats").to_request(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
