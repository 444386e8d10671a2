//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ContentCommand, ContentQuery, ContentRepository, CourseCommand, CourseQuery,
    CourseRepository, LoginService, PasswordHasher, StatsQuery, UserCommand, UserQuery,
    UserRepository,
};
use crate::domain::{ContentService, CourseService, StatsService, UserService};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub courses: Arc<dyn CourseQuery>,
    pub course_commands: Arc<dyn CourseCommand>,
    pub contents: Arc<dyn ContentQuery>,
    pub content_commands: Arc<dyn ContentCommand>,
    pub users: Arc<dyn UserQuery>,
    pub user_commands: Arc<dyn UserCommand>,
    pub login: Arc<dyn LoginService>,
    pub stats: Arc<dyn StatsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub courses: Arc<dyn CourseQuery>,
    pub course_commands: Arc<dyn CourseCommand>,
    pub contents: Arc<dyn ContentQuery>,
    pub content_commands: Arc<dyn ContentCommand>,
    pub users: Arc<dyn UserQuery>,
    pub user_commands: Arc<dyn UserCommand>,
    pub login: Arc<dyn LoginService>,
    pub stats: Arc<dyn StatsQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            courses,
            course_commands,
            contents,
            content_commands,
            users,
            user_commands,
            login,
            stats,
        } = ports;
        Self {
            courses,
            course_commands,
            contents,
            content_commands,
            users,
            user_commands,
            login,
            stats,
        }
    }

    /// Wire the domain services over a set of repositories.
    ///
    /// The same user service backs the user ports and login; the stats
    /// service reads through the three query ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use course_admin::inbound::http::state::HttpState;
    /// use course_admin::outbound::memory::InMemoryStore;
    /// use course_admin::outbound::security::Argon2PasswordHasher;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let state = HttpState::from_repositories(
    ///     store.clone(),
    ///     store.clone(),
    ///     store,
    ///     Arc::new(Argon2PasswordHasher::new()),
    ///     Arc::new(DefaultClock),
    /// );
    /// let _courses = state.courses.clone();
    /// ```
    pub fn from_repositories<C, T, U, H>(
        course_repo: Arc<C>,
        content_repo: Arc<T>,
        user_repo: Arc<U>,
        hasher: Arc<H>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        C: CourseRepository + 'static,
        T: ContentRepository + 'static,
        U: UserRepository + 'static,
        H: PasswordHasher + 'static,
    {
        let courses = Arc::new(CourseService::new(course_repo.clone(), clock.clone()));
        let contents = Arc::new(ContentService::new(content_repo, course_repo, clock.clone()));
        let users = Arc::new(UserService::new(user_repo, hasher, clock));
        let stats = Arc::new(StatsService::new(
            users.clone(),
            courses.clone(),
            contents.clone(),
        ));
        Self::new(HttpStatePorts {
            courses: courses.clone(),
            course_commands: courses,
            contents: contents.clone(),
            content_commands: contents,
            users: users.clone(),
            user_commands: users.clone(),
            login: users,
            stats,
        })
    }
}
