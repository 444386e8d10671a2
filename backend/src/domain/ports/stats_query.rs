//! Driving port for the dashboard summary.

use async_trait::async_trait;

use crate::domain::{Course, CourseContentCount, Error, User, Viewer};

/// Counts and recent activity shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    /// Total users.
    pub number_of_users: u64,
    /// Total courses.
    pub number_of_courses: u64,
    /// Total contents.
    pub number_of_contents: u64,
    /// Newest users; empty unless the viewer is an admin.
    pub latest_users: Vec<User>,
    /// Newest courses.
    pub latest_courses: Vec<Course>,
    /// Courses ranked by content count.
    pub courses_more_contents: Vec<CourseContentCount>,
}

/// Dashboard read use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsQuery: Send + Sync {
    /// Assemble the dashboard for `viewer`.
    async fn stats(&self, viewer: &Viewer) -> Result<DashboardStats, Error>;
}
