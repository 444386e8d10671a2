//! Course aggregate, its drafts and patches, and the content-count ranking
//! used by the dashboard.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::filter::{FieldSpec, FilterField, Filterable, MatchKind};
use super::text::{collate, require_text};
use super::CourseId;

/// Validation failures for course input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CourseValidationError {
    /// `name` was missing or blank.
    #[error("name should not be empty")]
    EmptyName,
    /// `description` was missing or blank.
    #[error("description should not be empty")]
    EmptyDescription,
}

impl CourseValidationError {
    /// Client-facing field the failure refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyDescription => "description",
        }
    }
}

/// Validated input for creating a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    name: String,
    description: String,
}

impl CourseDraft {
    /// Validate raw course fields.
    ///
    /// # Examples
    /// ```
    /// use course_admin::domain::{CourseDraft, CourseValidationError};
    ///
    /// assert!(CourseDraft::new("Math", "Algebra").is_ok());
    /// assert_eq!(
    ///     CourseDraft::new(" ", "Algebra").unwrap_err(),
    ///     CourseValidationError::EmptyName,
    /// );
    /// ```
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, CourseValidationError> {
        Ok(Self {
            name: require_text(name.into(), CourseValidationError::EmptyName)?,
            description: require_text(description.into(), CourseValidationError::EmptyDescription)?,
        })
    }
}

/// Partial update for a course; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursePatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
}

/// Top-level catalogue item owning zero or more contents.
///
/// ## Invariants
/// - `name` and `description` are non-empty once trimmed.
/// - `date_created` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    name: String,
    description: String,
    date_created: DateTime<Utc>,
}

impl Course {
    /// Assemble a course from a validated draft.
    pub fn new(id: CourseId, draft: CourseDraft, date_created: DateTime<Utc>) -> Self {
        let CourseDraft { name, description } = draft;
        Self {
            id,
            name,
            description,
            date_created,
        }
    }

    /// Rehydrate a course from storage without re-validating.
    pub fn from_stored(
        id: CourseId,
        name: String,
        description: String,
        date_created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            date_created,
        }
    }

    /// Merge a patch, validating only the fields it supplies.
    pub fn apply(self, patch: CoursePatch) -> Result<Self, CourseValidationError> {
        let CoursePatch { name, description } = patch;
        let draft = CourseDraft::new(
            name.unwrap_or(self.name),
            description.unwrap_or(self.description),
        )?;
        Ok(Self::new(self.id, draft, self.date_created))
    }

    /// Stable identifier.
    pub fn id(&self) -> CourseId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Creation timestamp.
    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    /// Default list ordering: name, then description, then id.
    pub fn default_order(&self, other: &Self) -> Ordering {
        collate(&self.name, &other.name)
            .then_with(|| collate(&self.description, &other.description))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Filterable course columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourseField {
    /// `name`
    Name,
    /// `description`
    Description,
    /// `dateCreated`
    DateCreated,
}

impl FilterField for CourseField {
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::new(Self::Name, "name", MatchKind::Contains),
        FieldSpec::new(Self::Description, "description", MatchKind::Contains),
        FieldSpec::new(Self::DateCreated, "dateCreated", MatchKind::CreatedAfter),
    ];
}

impl Filterable<CourseField> for Course {
    fn text(&self, field: CourseField) -> Option<&str> {
        match field {
            CourseField::Name => Some(self.name()),
            CourseField::Description => Some(self.description()),
            CourseField::DateCreated => None,
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.date_created
    }
}

/// A course paired with the number of contents it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseContentCount {
    /// The course.
    pub course: Course,
    /// Number of contents owned by the course.
    pub content_count: u64,
}

/// Rank courses by content count.
///
/// Courses without contents are dropped, the rest sorted by count descending
/// (ties by name, then id) and truncated to `limit`.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use course_admin::domain::{
///     Course, CourseContentCount, CourseDraft, CourseId, rank_by_content_count,
/// };
///
/// let course = |name: &str| {
///     Course::new(CourseId::random(), CourseDraft::new(name, "d").expect("draft"), Utc::now())
/// };
/// let ranked = rank_by_content_count(
///     vec![
///         CourseContentCount { course: course("a"), content_count: 0 },
///         CourseContentCount { course: course("b"), content_count: 2 },
///     ],
///     5,
/// );
/// assert_eq!(ranked.len(), 1);
/// ```
pub fn rank_by_content_count(
    counts: Vec<CourseContentCount>,
    limit: usize,
) -> Vec<CourseContentCount> {
    let mut ranked: Vec<_> = counts
        .into_iter()
        .filter(|entry| entry.content_count > 0)
        .collect();
    ranked.sort_by(|left, right| {
        right
            .content_count
            .cmp(&left.content_count)
            .then_with(|| collate(&left.course.name, &right.course.name))
            .then_with(|| left.course.id.cmp(&right.course.id))
    });
    ranked.truncate(limit);
    ranked
}
