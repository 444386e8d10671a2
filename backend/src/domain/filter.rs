//! Typed filter tables and the predicate builder shared by list
//! endpoints.
//!
//! Each filterable entity declares a static table of `(field, key, kind)`
//! entries. Callers collect raw client values into a [`FilterQuery`], and
//! [`build_predicate`] turns it into a [`Predicate`] that storage adapters
//! translate into SQL or evaluate in memory through [`Filterable`].
//!
//! Rules:
//! - fields absent from the query are unconstrained;
//! - `Contains` fields match case-insensitively as literal substrings, and an
//!   empty needle matches everything;
//! - `CreatedAfter` fields compare strictly greater than the parsed instant.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// How a filter value constrains its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Case-insensitive substring containment.
    Contains,
    /// Creation timestamp strictly after the supplied instant.
    CreatedAfter,
}

/// One row of an entity's filter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec<F> {
    /// Typed field.
    pub field: F,
    /// Client-facing query key (camelCase).
    pub key: &'static str,
    /// Matching behaviour.
    pub kind: MatchKind,
}

impl<F> FieldSpec<F> {
    /// Declare a table entry.
    pub const fn new(field: F, key: &'static str, kind: MatchKind) -> Self {
        Self { field, key, kind }
    }
}

/// A filterable column of some entity.
pub trait FilterField: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every filterable field with its key and match kind.
    const FIELDS: &'static [FieldSpec<Self>];

    /// Look up the table entry for this field.
    fn field_spec(self) -> FieldSpec<Self> {
        Self::FIELDS
            .iter()
            .copied()
            .find(|entry| entry.field == self)
            .unwrap_or(FieldSpec::new(self, "unknown", MatchKind::Contains))
    }

    /// Client-facing query key.
    fn key(self) -> &'static str {
        self.field_spec().key
    }

    /// Matching behaviour for this field.
    fn match_kind(self) -> MatchKind {
        self.field_spec().kind
    }
}

/// Raw, client-supplied filter values keyed by typed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery<F> {
    values: Vec<(F, String)>,
}

impl<F> Default for FilterQuery<F> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<F: FilterField> FilterQuery<F> {
    /// Start an empty query that constrains nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw value for `field`, replacing any earlier value.
    pub fn with(mut self, field: F, value: impl Into<String>) -> Self {
        self.values.retain(|(existing, _)| *existing != field);
        self.values.push((field, value.into()));
        self
    }

    /// Set `field` only when a value was supplied.
    pub fn with_optional(self, field: F, value: Option<String>) -> Self {
        match value {
            Some(value) => self.with(field, value),
            None => self,
        }
    }

    /// Raw value for `field`, if supplied.
    pub fn get(&self, field: F) -> Option<&str> {
        self.values
            .iter()
            .find(|(existing, _)| *existing == field)
            .map(|(_, value)| value.as_str())
    }

    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One resolved constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition<F> {
    /// The field contains `needle`, ignoring case.
    Contains {
        /// Constrained field.
        field: F,
        /// Literal substring to look for.
        needle: String,
    },
    /// The entity was created strictly after `after`.
    CreatedAfter {
        /// Constrained field.
        field: F,
        /// Exclusive lower bound.
        after: DateTime<Utc>,
    },
}

/// Conjunction of conditions derived from a [`FilterQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate<F> {
    conditions: Vec<Condition<F>>,
}

impl<F> Default for Predicate<F> {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }
}

impl<F: FilterField> Predicate<F> {
    /// Predicate matching every row.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Conditions in table order.
    pub fn conditions(&self) -> &[Condition<F>] {
        &self.conditions
    }

    /// True when the predicate matches everything.
    pub fn is_unconstrained(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate the predicate against an in-memory entity.
    pub fn matches<T: Filterable<F>>(&self, item: &T) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Contains { field, needle } => item
                .text(*field)
                .is_some_and(|text| contains_ignore_case(text, needle)),
            Condition::CreatedAfter { after, .. } => item.created_at() > *after,
        })
    }
}

/// Entities that can be matched in memory.
pub trait Filterable<F> {
    /// Text value of a `Contains` field.
    fn text(&self, field: F) -> Option<&str>;

    /// Creation timestamp used by `CreatedAfter` conditions.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Raised when a filter value cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// A date filter was neither RFC 3339 nor `YYYY-MM-DD`.
    #[error("{key} must be an RFC 3339 timestamp or a YYYY-MM-DD date")]
    InvalidDate {
        /// Query key of the offending field.
        key: &'static str,
        /// Rejected raw value.
        value: String,
    },
}

/// Build a predicate from raw filter values.
///
/// Conditions follow the field order of `F::FIELDS`. Blank date values are
/// treated as absent.
///
/// # Examples
/// ```
/// use course_admin::domain::{CourseField, FilterQuery, build_predicate};
///
/// let query = FilterQuery::new().with(CourseField::Name, "cat");
/// let predicate = build_predicate(&query).expect("valid filter");
/// assert_eq!(predicate.conditions().len(), 1);
/// ```
pub fn build_predicate<F: FilterField>(query: &FilterQuery<F>) -> Result<Predicate<F>, FilterError> {
    let mut conditions = Vec::new();
    for entry in F::FIELDS {
        let Some(raw) = query.get(entry.field) else {
            continue;
        };
        match entry.kind {
            MatchKind::Contains => conditions.push(Condition::Contains {
                field: entry.field,
                needle: raw.to_owned(),
            }),
            MatchKind::CreatedAfter => {
                if raw.trim().is_empty() {
                    continue;
                }
                let after = parse_instant(raw).ok_or_else(|| FilterError::InvalidDate {
                    key: entry.key,
                    value: raw.to_owned(),
                })?;
                conditions.push(Condition::CreatedAfter {
                    field: entry.field,
                    after,
                });
            }
        }
    }
    Ok(Predicate { conditions })
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
