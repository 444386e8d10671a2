//! Builders wiring repositories into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};
use zeroize::Zeroizing;

use course_admin::domain::UserService;
use course_admin::domain::ports::{ContentRepository, CourseRepository, UserRepository};
use course_admin::inbound::http::state::HttpState;
use course_admin::outbound::memory::InMemoryStore;
use course_admin::outbound::persistence::{
    DbPool, DieselContentRepository, DieselCourseRepository, DieselUserRepository,
};
use course_admin::outbound::security::Argon2PasswordHasher;

/// Administrator created on first start when the store holds no users.
pub struct AdminBootstrap {
    pub username: String,
    pub password: Zeroizing<String>,
}

/// Build the HTTP state over PostgreSQL when a pool is available, otherwise
/// over a fresh in-memory store.
///
/// # Errors
/// Returns [`std::io::Error`] when the admin bootstrap fails.
pub async fn build_http_state(
    db_pool: Option<DbPool>,
    admin: Option<AdminBootstrap>,
) -> std::io::Result<web::Data<HttpState>> {
    let state = match db_pool {
        Some(pool) => {
            info!(persistence = "postgres", "wiring repositories");
            wire(
                Arc::new(DieselCourseRepository::new(pool.clone())),
                Arc::new(DieselContentRepository::new(pool.clone())),
                Arc::new(DieselUserRepository::new(pool)),
                admin,
            )
            .await?
        }
        None => {
            warn!(
                persistence = "memory",
                "no database configured; data is lost on restart"
            );
            let store = Arc::new(InMemoryStore::new());
            wire(store.clone(), store.clone(), store, admin).await?
        }
    };
    Ok(web::Data::new(state))
}

async fn wire<C, T, U>(
    course_repo: Arc<C>,
    content_repo: Arc<T>,
    user_repo: Arc<U>,
    admin: Option<AdminBootstrap>,
) -> std::io::Result<HttpState>
where
    C: CourseRepository + 'static,
    T: ContentRepository + 'static,
    U: UserRepository + 'static,
{
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    if let Some(AdminBootstrap { username, password }) = admin {
        let users = UserService::new(user_repo.clone(), hasher.clone(), clock.clone());
        let created = users
            .bootstrap_admin(&username, password)
            .await
            .map_err(|e| std::io::Error::other(format!("admin bootstrap failed: {e}")))?;
        if created.is_none() {
            info!(%username, "users already exist; skipping admin bootstrap");
        }
    }
    Ok(HttpState::from_repositories(
        course_repo,
        content_repo,
        user_repo,
        hasher,
        clock,
    ))
}
