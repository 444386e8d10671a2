//! In-process repository adapters.
//!
//! [`InMemoryStore`] implements every repository port over a single mutex so
//! the server can run without PostgreSQL and tests can exercise the full
//! stack. Filtering and cascade rules mirror the Diesel adapters; text ordering
//! folds case first, which approximates PostgreSQL collation for ASCII names.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    ContentRepository, ContentRepositoryError, CourseRepository, CourseRepositoryError,
    StoredCredentials, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Content, ContentField, ContentId, Course, CourseContentCount, CourseField, CourseId,
    PasswordHash, Predicate, User, UserField, UserId,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Default)]
struct State {
    courses: HashMap<CourseId, Course>,
    contents: HashMap<ContentId, Content>,
    users: HashMap<UserId, StoredCredentials>,
}

/// Shared in-memory backing store for courses, contents and users.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(&self, poisoned: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, State>, E> {
        self.state.lock().map_err(|_| poisoned(POISONED))
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, uuid::Uuid)) {
    items.sort_by(|left, right| {
        let (left_date, left_id) = key(left);
        let (right_date, right_id) = key(right);
        right_date.cmp(&left_date).then(left_id.cmp(&right_id))
    });
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn create(&self, course: &Course) -> Result<(), CourseRepositoryError> {
        let mut state = self.lock(CourseRepositoryError::connection)?;
        state.courses.insert(course.id(), course.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        let state = self.lock(CourseRepositoryError::connection)?;
        Ok(state.courses.get(&id).cloned())
    }

    async fn find_page(
        &self,
        predicate: &Predicate<CourseField>,
        request: PageRequest,
    ) -> Result<Page<Course>, CourseRepositoryError> {
        let state = self.lock(CourseRepositoryError::connection)?;
        let mut matching: Vec<Course> = state
            .courses
            .values()
            .filter(|course| predicate.matches(*course))
            .cloned()
            .collect();
        matching.sort_by(Course::default_order);
        Ok(Page::from_sorted(matching, request))
    }

    async fn update(&self, course: &Course) -> Result<bool, CourseRepositoryError> {
        let mut state = self.lock(CourseRepositoryError::connection)?;
        Ok(state
            .courses
            .get_mut(&course.id())
            .map(|stored| *stored = course.clone())
            .is_some())
    }

    async fn delete(&self, id: CourseId) -> Result<bool, CourseRepositoryError> {
        let mut state = self.lock(CourseRepositoryError::connection)?;
        if state.courses.remove(&id).is_none() {
            return Ok(false);
        }
        state.contents.retain(|_, content| content.course_id() != id);
        Ok(true)
    }

    async fn count(&self) -> Result<u64, CourseRepositoryError> {
        let state = self.lock(CourseRepositoryError::connection)?;
        Ok(state.courses.len() as u64)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Course>, CourseRepositoryError> {
        let state = self.lock(CourseRepositoryError::connection)?;
        let mut courses: Vec<Course> = state.courses.values().cloned().collect();
        newest_first(&mut courses, |course| {
            (course.date_created(), *course.id().as_uuid())
        });
        courses.truncate(limit);
        Ok(courses)
    }

    async fn content_counts(&self) -> Result<Vec<CourseContentCount>, CourseRepositoryError> {
        let state = self.lock(CourseRepositoryError::connection)?;
        let mut per_course: HashMap<CourseId, u64> = HashMap::new();
        for content in state.contents.values() {
            *per_course.entry(content.course_id()).or_default() += 1;
        }
        Ok(state
            .courses
            .values()
            .map(|course| CourseContentCount {
                course: course.clone(),
                content_count: per_course.get(&course.id()).copied().unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl ContentRepository for InMemoryStore {
    async fn create(&self, content: &Content) -> Result<(), ContentRepositoryError> {
        let mut state = self.lock(ContentRepositoryError::connection)?;
        if !state.courses.contains_key(&content.course_id()) {
            return Err(ContentRepositoryError::query("owning course does not exist"));
        }
        state.contents.insert(content.id(), content.clone());
        Ok(())
    }

    async fn find(
        &self,
        course_id: CourseId,
        id: ContentId,
    ) -> Result<Option<Content>, ContentRepositoryError> {
        let state = self.lock(ContentRepositoryError::connection)?;
        Ok(state
            .contents
            .get(&id)
            .filter(|content| content.course_id() == course_id)
            .cloned())
    }

    async fn find_page(
        &self,
        course_id: CourseId,
        predicate: &Predicate<ContentField>,
        request: PageRequest,
    ) -> Result<Page<Content>, ContentRepositoryError> {
        let state = self.lock(ContentRepositoryError::connection)?;
        let mut matching: Vec<Content> = state
            .contents
            .values()
            .filter(|content| content.course_id() == course_id && predicate.matches(*content))
            .cloned()
            .collect();
        matching.sort_by(Content::default_order);
        Ok(Page::from_sorted(matching, request))
    }

    async fn update(&self, content: &Content) -> Result<bool, ContentRepositoryError> {
        let mut state = self.lock(ContentRepositoryError::connection)?;
        Ok(state
            .contents
            .get_mut(&content.id())
            .filter(|stored| stored.course_id() == content.course_id())
            .map(|stored| *stored = content.clone())
            .is_some())
    }

    async fn delete(
        &self,
        course_id: CourseId,
        id: ContentId,
    ) -> Result<bool, ContentRepositoryError> {
        let mut state = self.lock(ContentRepositoryError::connection)?;
        let owned = state
            .contents
            .get(&id)
            .is_some_and(|content| content.course_id() == course_id);
        if owned {
            state.contents.remove(&id);
        }
        Ok(owned)
    }

    async fn count(&self) -> Result<u64, ContentRepositoryError> {
        let state = self.lock(ContentRepositoryError::connection)?;
        Ok(state.contents.len() as u64)
    }
}

fn username_taken(state: &State, username: &str, except: Option<UserId>) -> bool {
    state
        .users
        .values()
        .any(|stored| stored.user.username() == username && Some(stored.user.id()) != except)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserRepositoryError> {
        let mut state = self.lock(UserRepositoryError::connection)?;
        if username_taken(&state, user.username(), None) {
            return Err(UserRepositoryError::duplicate_username(user.username()));
        }
        state.users.insert(
            user.id(),
            StoredCredentials {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock(UserRepositoryError::connection)?;
        Ok(state.users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let state = self.lock(UserRepositoryError::connection)?;
        Ok(state
            .users
            .values()
            .find(|stored| stored.user.username() == username)
            .cloned())
    }

    async fn find_page(
        &self,
        predicate: &Predicate<UserField>,
        request: PageRequest,
    ) -> Result<Page<User>, UserRepositoryError> {
        let state = self.lock(UserRepositoryError::connection)?;
        let mut matching: Vec<User> = state
            .users
            .values()
            .map(|stored| &stored.user)
            .filter(|user| predicate.matches(*user))
            .cloned()
            .collect();
        matching.sort_by(User::default_order);
        Ok(Page::from_sorted(matching, request))
    }

    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<bool, UserRepositoryError> {
        let mut state = self.lock(UserRepositoryError::connection)?;
        if username_taken(&state, user.username(), Some(user.id())) {
            return Err(UserRepositoryError::duplicate_username(user.username()));
        }
        let Some(stored) = state.users.get_mut(&user.id()) else {
            return Ok(false);
        };
        stored.user = user.clone();
        if let Some(hash) = password_hash {
            stored.password_hash = hash;
        }
        Ok(true)
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut state = self.lock(UserRepositoryError::connection)?;
        Ok(state.users.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        let state = self.lock(UserRepositoryError::connection)?;
        Ok(state.users.len() as u64)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.lock(UserRepositoryError::connection)?;
        let mut users: Vec<User> = state
            .users
            .values()
            .map(|stored| stored.user.clone())
            .collect();
        newest_first(&mut users, |user| (user.date_created(), *user.id().as_uuid()));
        users.truncate(limit);
        Ok(users)
    }
}
