//! Tests for the domain user model.

use super::*;
use crate::domain::{build_predicate, FilterQuery};
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};

fn password(raw: &str) -> Zeroizing<String> {
    Zeroizing::new(raw.to_owned())
}

#[fixture]
fn draft() -> UserDraft {
    UserDraft::new("Ada", "Lovelace", "ada", password("s3cret")).expect("valid draft")
}

#[fixture]
fn user(draft: UserDraft) -> User {
    User::new(UserId::random(), draft, Utc::now())
}

#[rstest]
#[case("", "Lovelace", "ada", "pw", UserValidationError::EmptyFirstName)]
#[case("Ada", " ", "ada", "pw", UserValidationError::EmptyLastName)]
#[case("Ada", "Lovelace", "   ", "pw", UserValidationError::EmptyUsername)]
#[case("Ada", "Lovelace", "ada", "", UserValidationError::EmptyPassword)]
fn draft_rejects_missing_fields(
    #[case] first_name: &str,
    #[case] last_name: &str,
    #[case] username: &str,
    #[case] raw_password: &str,
    #[case] expected: UserValidationError,
) {
    let err = UserDraft::new(first_name, last_name, username, password(raw_password))
        .expect_err("invalid draft");
    assert_eq!(err, expected);
}

#[rstest]
fn draft_defaults_to_active_user(user: User) {
    assert_eq!(user.role(), Role::User);
    assert!(user.is_active());
}

#[rstest]
#[case("user", Role::User)]
#[case("editor", Role::Editor)]
#[case("admin", Role::Admin)]
fn role_parses_lowercase(#[case] raw: &str, #[case] expected: Role) {
    let parsed: Role = raw.parse().expect("known role");
    assert_eq!(parsed, expected);
    assert_eq!(parsed.to_string(), raw);
}

#[rstest]
#[case("Admin")]
#[case("root")]
fn role_rejects_unknown_values(#[case] raw: &str) {
    let err = raw.parse::<Role>().expect_err("unknown role");
    assert_eq!(err.value(), raw);
}

#[rstest]
fn role_serialises_lowercase() {
    let value = serde_json::to_value(Role::Editor).expect("serialise role");
    assert_eq!(value, serde_json::json!("editor"));
}

#[rstest]
fn patch_preserves_omitted_fields(user: User) {
    let (updated, new_password) = user
        .clone()
        .apply(UserPatch {
            last_name: Some("Byron".to_owned()),
            ..UserPatch::default()
        })
        .expect("valid patch");

    assert_eq!(updated.first_name(), "Ada");
    assert_eq!(updated.last_name(), "Byron");
    assert_eq!(updated.username(), user.username());
    assert_eq!(updated.date_created(), user.date_created());
    assert!(new_password.is_none());
}

#[rstest]
fn patch_rejects_empty_password(user: User) {
    let err = user
        .apply(UserPatch {
            password: Some(password("")),
            ..UserPatch::default()
        })
        .expect_err("empty password");
    assert_eq!(err, UserValidationError::EmptyPassword);
}

#[rstest]
#[case(Some(Role::Admin), None, true)]
#[case(None, Some(false), true)]
#[case(Some(Role::User), Some(true), false)]
#[case(None, None, false)]
fn privilege_changes_are_detected(
    user: User,
    #[case] role: Option<Role>,
    #[case] is_active: Option<bool>,
    #[case] expected: bool,
) {
    let patch = UserPatch {
        role,
        is_active,
        ..UserPatch::default()
    };
    assert_eq!(patch.changes_privileges(&user), expected);
}

#[rstest]
fn role_filter_matches_substring(user: User) {
    let predicate =
        build_predicate(&FilterQuery::new().with(UserField::Role, "US")).expect("valid filter");
    assert!(predicate.matches(&user));
}

#[given("an editor draft")]
fn an_editor_draft() -> UserDraft {
    UserDraft::new("Grace", "Hopper", "grace", password("cobol"))
        .expect("valid draft")
        .with_role(Role::Editor)
}

#[when("the user is created")]
fn the_user_is_created(draft: UserDraft) -> User {
    User::new(UserId::random(), draft, Utc::now())
}

#[then("the role is kept")]
fn the_role_is_kept(user: &User) {
    assert_eq!(user.role(), Role::Editor);
    assert_eq!(user.username(), "grace");
}

#[rstest]
fn creating_an_editor_keeps_the_role() {
    let draft = an_editor_draft();
    let user = the_user_is_created(draft);
    the_role_is_kept(&user);
}
