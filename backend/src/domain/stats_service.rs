//! Dashboard aggregation over the course, content and user queries.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{ContentQuery, CourseQuery, DashboardStats, StatsQuery, UserQuery};
use crate::domain::{Error, Viewer};

/// Stats service implementing [`StatsQuery`].
///
/// Reads run one after another with no caching; the counts may drift
/// relative to each other under concurrent writes.
#[derive(Clone)]
pub struct StatsService {
    users: Arc<dyn UserQuery>,
    courses: Arc<dyn CourseQuery>,
    contents: Arc<dyn ContentQuery>,
}

impl StatsService {
    /// Create a stats service over the three query ports.
    pub fn new(
        users: Arc<dyn UserQuery>,
        courses: Arc<dyn CourseQuery>,
        contents: Arc<dyn ContentQuery>,
    ) -> Self {
        Self {
            users,
            courses,
            contents,
        }
    }
}

#[async_trait]
impl StatsQuery for StatsService {
    async fn stats(&self, viewer: &Viewer) -> Result<DashboardStats, Error> {
        let number_of_users = self.users.count().await?;
        let number_of_courses = self.courses.count().await?;
        let number_of_contents = self.contents.count().await?;
        let latest_users = if viewer.is_admin() {
            self.users.latest().await?
        } else {
            Vec::new()
        };
        let latest_courses = self.courses.latest().await?;
        let courses_more_contents = self.courses.most_contents().await?;

        Ok(DashboardStats {
            number_of_users,
            number_of_courses,
            number_of_contents,
            latest_users,
            latest_courses,
            courses_more_contents,
        })
    }
}
