//! Tests for the user service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockPasswordHasher, MockUserRepository, StoredCredentials};
use crate::domain::test_clock::{fixture_clock, fixture_timestamp};

type Service = UserService<MockUserRepository, MockPasswordHasher>;

fn secret(raw: &str) -> Zeroizing<String> {
    Zeroizing::new(raw.to_owned())
}

fn account(username: &str, role: Role) -> User {
    User::new(
        UserId::random(),
        UserDraft::new("Ada", "Lovelace", username, secret("pw"))
            .expect("valid draft")
            .with_role(role),
        fixture_timestamp(),
    )
}

fn hashing_hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|password| Ok(PasswordHash::new(format!("hashed:{password}"))));
    hasher
        .expect_verify()
        .returning(|password, hash| Ok(hash.as_str() == format!("hashed:{password}")));
    hasher
}

fn service(repo: MockUserRepository) -> Service {
    UserService::new(Arc::new(repo), Arc::new(hashing_hasher()), fixture_clock())
}

fn admin() -> Viewer {
    Viewer::new(UserId::random(), Role::Admin)
}

#[tokio::test]
async fn create_hashes_password_before_storing() {
    let mut repo = MockUserRepository::new();
    repo.expect_create()
        .withf(|user, hash| user.username() == "grace" && hash.as_str() == "hashed:cobol")
        .times(1)
        .return_once(|_, _| Ok(()));

    let user = service(repo)
        .create(
            &admin(),
            UserDraft::new("Grace", "Hopper", "grace", secret("cobol")).expect("valid draft"),
        )
        .await
        .expect("create succeeds");

    assert_eq!(user.role(), Role::User);
    assert!(user.is_active());
    assert_eq!(user.date_created(), fixture_timestamp());
}

#[tokio::test]
async fn create_maps_duplicate_username_to_conflict() {
    let mut repo = MockUserRepository::new();
    repo.expect_create()
        .times(1)
        .return_once(|_, _| Err(UserRepositoryError::duplicate_username("grace")));

    let error = service(repo)
        .create(
            &admin(),
            UserDraft::new("Grace", "Hopper", "grace", secret("cobol")).expect("valid draft"),
        )
        .await
        .expect_err("duplicate username");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(Role::User)]
#[case(Role::Editor)]
#[tokio::test]
async fn non_admins_cannot_list_users(#[case] role: Role) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_page().times(0);

    let error = service(repo)
        .list(
            &Viewer::new(UserId::random(), role),
            FilterQuery::new(),
            PageRequest::default(),
        )
        .await
        .expect_err("forbidden");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn user_may_update_own_name() {
    let stored = account("ada", Role::User);
    let viewer = Viewer::from_user(&stored);
    let id = stored.id();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(id))
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_update()
        .withf(|user, hash| user.first_name() == "Augusta" && hash.is_none())
        .times(1)
        .return_once(|_, _| Ok(true));

    let updated = service(repo)
        .update(
            &viewer,
            id,
            UserPatch {
                first_name: Some("Augusta".to_owned()),
                role: Some(Role::User),
                ..UserPatch::default()
            },
        )
        .await
        .expect("self update succeeds");

    assert_eq!(updated.first_name(), "Augusta");
}

#[tokio::test]
async fn user_cannot_promote_self() {
    let stored = account("ada", Role::User);
    let viewer = Viewer::from_user(&stored);
    let id = stored.id();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_update().times(0);

    let error = service(repo)
        .update(
            &viewer,
            id,
            UserPatch {
                role: Some(Role::Admin),
                ..UserPatch::default()
            },
        )
        .await
        .expect_err("forbidden");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn user_cannot_update_someone_else() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(0);

    let error = service(repo)
        .update(
            &Viewer::new(UserId::random(), Role::Editor),
            UserId::random(),
            UserPatch::default(),
        )
        .await
        .expect_err("forbidden");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn password_change_is_rehashed() {
    let stored = account("ada", Role::User);
    let id = stored.id();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    repo.expect_update()
        .withf(|_, hash| {
            hash.as_ref()
                .is_some_and(|value| value.as_str() == "hashed:new-secret")
        })
        .times(1)
        .return_once(|_, _| Ok(true));

    service(repo)
        .update(
            &admin(),
            id,
            UserPatch {
                password: Some(secret("new-secret")),
                ..UserPatch::default()
            },
        )
        .await
        .expect("password change succeeds");
}

#[tokio::test]
async fn admin_cannot_delete_self() {
    let viewer = admin();
    let mut repo = MockUserRepository::new();
    repo.expect_delete().times(0);

    let error = service(repo)
        .delete(&viewer, viewer.id())
        .await
        .expect_err("self delete");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn delete_missing_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_delete().times(1).return_once(|_| Ok(false));

    let error = service(repo)
        .delete(&admin(), UserId::random())
        .await
        .expect_err("missing user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

fn repo_with_credentials(user: User) -> MockUserRepository {
    let mut repo = MockUserRepository::new();
    repo.expect_find_credentials()
        .return_once(move |_| {
            Ok(Some(StoredCredentials {
                user,
                password_hash: PasswordHash::new("hashed:pw"),
            }))
        });
    repo
}

#[rstest]
#[case("pw", true)]
#[case("wrong", false)]
#[tokio::test]
async fn authenticate_checks_password(#[case] password: &str, #[case] accepted: bool) {
    let login = service(repo_with_credentials(account("ada", Role::User)));
    let credentials = LoginCredentials::try_from_parts("ada", password).expect("credentials");

    let result = login.authenticate(&credentials).await;

    match result {
        Ok(user) => {
            assert!(accepted);
            assert_eq!(user.username(), "ada");
        }
        Err(error) => {
            assert!(!accepted);
            assert_eq!(error.code(), ErrorCode::Unauthorized);
        }
    }
}

#[tokio::test]
async fn inactive_user_cannot_log_in() {
    let (inactive, _) = account("ada", Role::User)
        .apply(UserPatch {
            is_active: Some(false),
            ..UserPatch::default()
        })
        .expect("valid patch");
    let login = service(repo_with_credentials(inactive));
    let credentials = LoginCredentials::try_from_parts("ada", "pw").expect("credentials");

    let error = login
        .authenticate(&credentials)
        .await
        .expect_err("inactive account");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn unknown_username_still_pays_for_a_hash_check() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_credentials().return_once(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|password, hash| password == "pw" && hash.as_str() == UNKNOWN_USER_HASH)
        .times(1)
        .returning(|_, _| Ok(false));
    let login = UserService::new(Arc::new(repo), Arc::new(hasher), fixture_clock());
    let credentials = LoginCredentials::try_from_parts("ghost", "pw").expect("credentials");

    let error = login
        .authenticate(&credentials)
        .await
        .expect_err("unknown user");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "invalid credentials");
}

#[rstest]
fn unknown_user_hash_is_a_valid_argon2_hash() {
    let argon2 = crate::outbound::security::Argon2PasswordHasher::new();

    let verified = argon2
        .verify("pw", &PasswordHash::new(UNKNOWN_USER_HASH))
        .expect("well-formed hash");

    assert!(!verified);
}

#[tokio::test]
async fn resolve_session_rejects_deleted_accounts() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let error = service(repo)
        .resolve_session(UserId::random())
        .await
        .expect_err("stale session");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn bootstrap_admin_only_runs_on_empty_store() {
    let mut repo = MockUserRepository::new();
    repo.expect_count().times(1).return_once(|| Ok(3));
    repo.expect_create().times(0);

    let created = service(repo)
        .bootstrap_admin("root", secret("pw"))
        .await
        .expect("bootstrap succeeds");

    assert!(created.is_none());
}

#[tokio::test]
async fn bootstrap_admin_creates_active_admin() {
    let mut repo = MockUserRepository::new();
    repo.expect_count().times(1).return_once(|| Ok(0));
    repo.expect_create()
        .withf(|user, _| user.role() == Role::Admin && user.is_active())
        .times(1)
        .return_once(|_, _| Ok(()));

    let created = service(repo)
        .bootstrap_admin("root", secret("pw"))
        .await
        .expect("bootstrap succeeds")
        .expect("admin created");

    assert_eq!(created.username(), "root");
}
