//! User accounts, roles and the validation applied to user input.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::filter::{FieldSpec, FilterField, Filterable, MatchKind};
use super::text::{collate, require_text};
use super::UserId;

/// Validation errors raised while building or patching a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// `firstName` was missing or blank.
    #[error("firstName should not be empty")]
    EmptyFirstName,
    /// `lastName` was missing or blank.
    #[error("lastName should not be empty")]
    EmptyLastName,
    /// `username` was missing or blank.
    #[error("username should not be empty")]
    EmptyUsername,
    /// `password` was missing or empty.
    #[error("password should not be empty")]
    EmptyPassword,
}

impl UserValidationError {
    /// Client-facing field the failure refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyFirstName => "firstName",
            Self::EmptyLastName => "lastName",
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }
}

/// Access level granted to a user.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access to the catalogue.
    #[default]
    User,
    /// May edit courses and contents.
    Editor,
    /// Full access, including user management.
    Admin,
}

impl Role {
    /// Lowercase wire and storage form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored or supplied role is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("role must be one of user, editor or admin, got {value:?}")]
pub struct UnknownRoleError {
    value: String,
}

impl UnknownRoleError {
    /// The rejected input.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRoleError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validated input for creating a user.
///
/// The password is held in [`Zeroizing`] and dropped once hashed.
#[derive(Debug, Clone)]
pub struct UserDraft {
    first_name: String,
    last_name: String,
    username: String,
    password: Zeroizing<String>,
    role: Role,
    is_active: bool,
}

impl UserDraft {
    /// Validate the required fields. Role defaults to [`Role::User`] and the
    /// account starts active.
    ///
    /// # Examples
    /// ```
    /// use course_admin::domain::{Role, UserDraft};
    /// use zeroize::Zeroizing;
    ///
    /// let draft = UserDraft::new("Ada", "Lovelace", " ada ", Zeroizing::new("s3cret".to_owned()))
    ///     .expect("valid draft");
    /// assert_eq!(draft.username(), "ada");
    /// assert_eq!(draft.role(), Role::User);
    /// ```
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        username: impl Into<String>,
        password: Zeroizing<String>,
    ) -> Result<Self, UserValidationError> {
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self {
            first_name: require_text(first_name.into(), UserValidationError::EmptyFirstName)?,
            last_name: require_text(last_name.into(), UserValidationError::EmptyLastName)?,
            username: normalise_username(username.into())?,
            password,
            role: Role::default(),
            is_active: true,
        })
    }

    /// Override the default role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Username after trimming.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Requested role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Plain-text password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Partial update for a user. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    /// Replacement first name.
    pub first_name: Option<String>,
    /// Replacement last name.
    pub last_name: Option<String>,
    /// Replacement username.
    pub username: Option<String>,
    /// New password; re-hashed before storage.
    pub password: Option<Zeroizing<String>>,
    /// New role.
    pub role: Option<Role>,
    /// New activation flag.
    pub is_active: Option<bool>,
}

impl UserPatch {
    /// True when applying the patch would change `role` or `is_active`.
    pub fn changes_privileges(&self, current: &User) -> bool {
        self.role.is_some_and(|role| role != current.role)
            || self
                .is_active
                .is_some_and(|is_active| is_active != current.is_active)
    }
}

/// Registered account.
///
/// The password hash is deliberately absent; it stays behind the
/// repository port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    username: String,
    role: Role,
    is_active: bool,
    date_created: DateTime<Utc>,
}

impl User {
    /// Build a user from a validated draft, discarding its password.
    pub fn new(id: UserId, draft: UserDraft, date_created: DateTime<Utc>) -> Self {
        let UserDraft {
            first_name,
            last_name,
            username,
            role,
            is_active,
            ..
        } = draft;
        Self {
            id,
            first_name,
            last_name,
            username,
            role,
            is_active,
            date_created,
        }
    }

    /// Rehydrate a user from storage without re-validating.
    pub fn from_stored(
        id: UserId,
        first_name: String,
        last_name: String,
        username: String,
        role: Role,
        is_active: bool,
        date_created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            username,
            role,
            is_active,
            date_created,
        }
    }

    /// Merge a patch, returning the updated user and any new password.
    pub fn apply(
        self,
        patch: UserPatch,
    ) -> Result<(Self, Option<Zeroizing<String>>), UserValidationError> {
        let UserPatch {
            first_name,
            last_name,
            username,
            password,
            role,
            is_active,
        } = patch;
        if password.as_ref().is_some_and(|value| value.is_empty()) {
            return Err(UserValidationError::EmptyPassword);
        }
        let first_name = match first_name {
            Some(value) => require_text(value, UserValidationError::EmptyFirstName)?,
            None => self.first_name,
        };
        let last_name = match last_name {
            Some(value) => require_text(value, UserValidationError::EmptyLastName)?,
            None => self.last_name,
        };
        let username = match username {
            Some(value) => normalise_username(value)?,
            None => self.username,
        };
        let updated = Self {
            id: self.id,
            first_name,
            last_name,
            username,
            role: role.unwrap_or(self.role),
            is_active: is_active.unwrap_or(self.is_active),
            date_created: self.date_created,
        };
        Ok((updated, password))
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Given name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Unique login name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Access level.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the account may sign in.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Creation timestamp.
    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    /// Default list ordering: username, then id.
    pub fn default_order(&self, other: &Self) -> Ordering {
        collate(&self.username, &other.username)
            .then_with(|| self.id.cmp(&other.id))
    }
}

fn normalise_username(raw: String) -> Result<String, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }
    Ok(trimmed.to_owned())
}

/// Filterable user columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    /// `firstName`
    FirstName,
    /// `lastName`
    LastName,
    /// `username`
    Username,
    /// `role`
    Role,
}

impl FilterField for UserField {
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::new(Self::FirstName, "firstName", MatchKind::Contains),
        FieldSpec::new(Self::LastName, "lastName", MatchKind::Contains),
        FieldSpec::new(Self::Username, "username", MatchKind::Contains),
        FieldSpec::new(Self::Role, "role", MatchKind::Contains),
    ];
}

impl Filterable<UserField> for User {
    fn text(&self, field: UserField) -> Option<&str> {
        Some(match field {
            UserField::FirstName => self.first_name(),
            UserField::LastName => self.last_name(),
            UserField::Username => self.username(),
            UserField::Role => self.role.as_str(),
        })
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.date_created
    }
}

#[cfg(test)]
mod tests;
