//! Content items nested under a course.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::filter::{FieldSpec, FilterField, Filterable, MatchKind};
use super::text::{collate, optional_text, require_text};
use super::{ContentId, CourseId};

/// Validation failures for content input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContentValidationError {
    /// `name` was missing or blank.
    #[error("name should not be empty")]
    EmptyName,
    /// `description` was missing or blank.
    #[error("description should not be empty")]
    EmptyDescription,
}

impl ContentValidationError {
    /// Client-facing field the failure refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyDescription => "description",
        }
    }
}

/// Validated input for creating a content item.
///
/// A blank `image_url` is stored as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDraft {
    name: String,
    description: String,
    image_url: Option<String>,
}

impl ContentDraft {
    /// Validate raw content fields.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image_url: Option<String>,
    ) -> Result<Self, ContentValidationError> {
        Ok(Self {
            name: require_text(name.into(), ContentValidationError::EmptyName)?,
            description: require_text(
                description.into(),
                ContentValidationError::EmptyDescription,
            )?,
            image_url: optional_text(image_url),
        })
    }
}

/// Partial update for a content item.
///
/// `image_url` distinguishes "leave as is" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement or cleared image URL.
    pub image_url: Option<Option<String>>,
}

/// A lesson or resource belonging to exactly one course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    id: ContentId,
    course_id: CourseId,
    name: String,
    description: String,
    image_url: Option<String>,
    date_created: DateTime<Utc>,
}

impl Content {
    /// Assemble a content item owned by `course_id`.
    pub fn new(
        id: ContentId,
        course_id: CourseId,
        draft: ContentDraft,
        date_created: DateTime<Utc>,
    ) -> Self {
        let ContentDraft {
            name,
            description,
            image_url,
        } = draft;
        Self {
            id,
            course_id,
            name,
            description,
            image_url,
            date_created,
        }
    }

    /// Rehydrate a content item from storage without re-validating.
    pub fn from_stored(
        id: ContentId,
        course_id: CourseId,
        name: String,
        description: String,
        image_url: Option<String>,
        date_created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            course_id,
            name,
            description,
            image_url,
            date_created,
        }
    }

    /// Merge a patch. The owning course and creation time never change.
    pub fn apply(self, patch: ContentPatch) -> Result<Self, ContentValidationError> {
        let ContentPatch {
            name,
            description,
            image_url,
        } = patch;
        let draft = ContentDraft::new(
            name.unwrap_or(self.name),
            description.unwrap_or(self.description),
            image_url.unwrap_or(self.image_url),
        )?;
        Ok(Self::new(self.id, self.course_id, draft, self.date_created))
    }

    /// Stable identifier.
    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Owning course.
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Optional illustration URL.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Creation timestamp.
    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    /// Default list ordering: name, then id.
    pub fn default_order(&self, other: &Self) -> Ordering {
        collate(&self.name, &other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Filterable content columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentField {
    /// `name`
    Name,
    /// `description`
    Description,
    /// `dateCreated`
    DateCreated,
}

impl FilterField for ContentField {
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::new(Self::Name, "name", MatchKind::Contains),
        FieldSpec::new(Self::Description, "description", MatchKind::Contains),
        FieldSpec::new(Self::DateCreated, "dateCreated", MatchKind::CreatedAfter),
    ];
}

impl Filterable<ContentField> for Content {
    fn text(&self, field: ContentField) -> Option<&str> {
        match field {
            ContentField::Name => Some(self.name()),
            ContentField::Description => Some(self.description()),
            ContentField::DateCreated => None,
        }
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.date_created
    }
}
