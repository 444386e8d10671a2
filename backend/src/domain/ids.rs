//! Strongly typed UUID identifiers for catalogue entities and users.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raised when a string cannot be parsed as an entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} id must be a valid UUID")]
pub struct InvalidIdError {
    kind: &'static str,
}

impl InvalidIdError {
    /// Entity label the identifier belonged to, such as `course`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its canonical string form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, InvalidIdError> {
                Uuid::parse_str(raw.as_ref())
                    .map(Self)
                    .map_err(|_| InvalidIdError { kind: $kind })
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = InvalidIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_entity_id! {
    /// Identifier of a [`crate::domain::Course`].
    CourseId => "course"
}

define_entity_id! {
    /// Identifier of a [`crate::domain::Content`].
    ContentId => "content"
}

define_entity_id! {
    /// Identifier of a [`crate::domain::User`].
    UserId => "user"
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_canonical_uuid() {
        let id = CourseId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case("3fa85f64-5717-4562-b3fc")]
    fn rejects_malformed_input(#[case] raw: &str) {
        let err = ContentId::new(raw).expect_err("invalid id");
        assert_eq!(err.kind(), "content");
        assert_eq!(err.to_string(), "content id must be a valid UUID");
    }

    #[rstest]
    fn serialises_as_plain_string() {
        let id = UserId::from_uuid(Uuid::nil());
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }
}
