//! Authentication and authorisation primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Authorisation is expressed as [`Capability`] checks against the
//! [`Viewer`] resolved for the current request.

use std::fmt;

use zeroize::Zeroizing;

use super::{Error, Role, User, UserId};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl LoginValidationError {
    /// Client-facing field the failure refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use course_admin::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("admin", "password").expect("valid");
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Argon2 PHC string for a stored password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Actions guarded by role checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Read courses, contents and the dashboard.
    BrowseCatalogue,
    /// Create or update courses and contents.
    EditCatalogue,
    /// Delete courses and contents.
    DeleteCatalogue,
    /// List, create, update or delete any user.
    ManageUsers,
}

impl Role {
    /// Whether this role grants `capability`.
    ///
    /// # Examples
    /// ```
    /// use course_admin::domain::{Capability, Role};
    ///
    /// assert!(Role::Editor.allows(Capability::EditCatalogue));
    /// assert!(!Role::Editor.allows(Capability::DeleteCatalogue));
    /// assert!(!Role::Editor.allows(Capability::ManageUsers));
    /// ```
    pub const fn allows(self, capability: Capability) -> bool {
        match capability {
            Capability::BrowseCatalogue => true,
            Capability::EditCatalogue => matches!(self, Self::Editor | Self::Admin),
            Capability::DeleteCatalogue | Capability::ManageUsers => matches!(self, Self::Admin),
        }
    }
}

/// Authenticated principal making the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    id: UserId,
    role: Role,
}

impl Viewer {
    /// Build a viewer from explicit parts.
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Viewer acting as `user`.
    pub fn from_user(user: &User) -> Self {
        Self::new(user.id(), user.role())
    }

    /// Identifier of the acting user.
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Role of the acting user.
    pub const fn role(&self) -> Role {
        self.role
    }

    /// True for administrators.
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Fail with `forbidden` unless the role grants `capability`.
    pub fn authorize(&self, capability: Capability) -> Result<(), Error> {
        if self.role.allows(capability) {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "role {} may not perform this action",
                self.role
            )))
        }
    }

    /// Fail with `forbidden` unless the viewer is `target` or an admin.
    pub fn authorize_self_or_admin(&self, target: UserId) -> Result<(), Error> {
        if self.id == target || self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("you may only access your own account"))
        }
    }
}
