//! Tests for the account service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockTokenService, MockUserRepository};
use crate::domain::test_support::fixture_timestamp;
use crate::domain::{ErrorCode, StoredCredentials, UserId};

type Service = AccountServiceImpl<MockUserRepository, MockPasswordHasher, MockTokenService>;

fn make_service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockTokenService,
) -> Service {
    AccountServiceImpl::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens))
}

fn user(id: i32, email: &str, is_admin: bool) -> User {
    User {
        id: UserId::new(id),
        name: "Maria".into(),
        email: email.into(),
        is_admin,
        created_at: fixture_timestamp(),
    }
}

fn registration(email: &str, password: &str) -> Registration {
    Registration {
        name: "Maria".into(),
        email: email.into(),
        password: password.into(),
    }
}

fn hashing() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(|password| Ok(format!("hashed:{password}")));
    hasher
}

fn issuing() -> MockTokenService {
    let mut tokens = MockTokenService::new();
    tokens
        .expect_issue()
        .times(1)
        .returning(|user| Ok(format!("token-{}", user.id)));
    tokens
}

#[tokio::test]
async fn register_normalises_email_and_issues_token() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email == "maria@example.com")
        .times(1)
        .return_once(|_| Ok(None));
    users
        .expect_create()
        .withf(|new| {
            new.email == "maria@example.com"
                && new.password_hash == "hashed:secret1"
                && !new.is_admin
        })
        .times(1)
        .return_once(|new| Ok(user(10, &new.email, false)));

    let session = make_service(users, hashing(), issuing())
        .register(registration("  Maria@Example.com ", "secret1"))
        .await
        .expect("registered");

    assert_eq!(session.user.id, UserId::new(10));
    assert_eq!(session.token, "token-10");
}

#[rstest]
#[case(registration("", "secret1"), REGISTRATION_FIELDS_REQUIRED)]
#[case(registration("a@b.c", ""), REGISTRATION_FIELDS_REQUIRED)]
#[case(registration("a@b.c", "12345"), PASSWORD_TOO_SHORT)]
#[tokio::test]
async fn register_validates_input(#[case] input: Registration, #[case] message: &str) {
    let err = make_service(
        MockUserRepository::new(),
        MockPasswordHasher::new(),
        MockTokenService::new(),
    )
    .register(input)
    .await
    .expect_err("invalid");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), message);
}

#[tokio::test]
async fn register_rejects_existing_email() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(1).return_once(|email| {
        Ok(Some(StoredCredentials {
            user: user(3, email, false),
            password_hash: "x".into(),
        }))
    });
    users.expect_create().times(0);

    let err = make_service(users, MockPasswordHasher::new(), MockTokenService::new())
        .register(registration("maria@example.com", "secret1"))
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), EMAIL_TAKEN);
}

fn stored(hash: &str) -> MockUserRepository {
    let hash = hash.to_owned();
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(1).return_once(move |email| {
        Ok(Some(StoredCredentials {
            user: user(4, email, false),
            password_hash: hash,
        }))
    });
    users
}

fn verifying(result: bool) -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .times(1)
        .return_once(move |_, _| Ok(result));
    hasher
}

#[tokio::test]
async fn login_issues_token_for_matching_password() {
    let session = make_service(stored("hash"), verifying(true), issuing())
        .login(LoginCredentials {
            email: "maria@example.com".into(),
            password: "secret1".into(),
        })
        .await
        .expect("logged in");

    assert_eq!(session.token, "token-4");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let err = make_service(stored("hash"), verifying(false), MockTokenService::new())
        .login(LoginCredentials {
            email: "maria@example.com".into(),
            password: "nope".into(),
        })
        .await
        .expect_err("wrong password");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), BAD_CREDENTIALS);
}

#[tokio::test]
async fn login_rejects_unknown_email_with_same_message() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(1).return_once(|_| Ok(None));

    let err = make_service(users, MockPasswordHasher::new(), MockTokenService::new())
        .login(LoginCredentials {
            email: "ghost@example.com".into(),
            password: "secret1".into(),
        })
        .await
        .expect_err("unknown");

    assert_eq!(err.message(), BAD_CREDENTIALS);
}

#[tokio::test]
async fn login_requires_both_fields() {
    let err = make_service(
        MockUserRepository::new(),
        MockPasswordHasher::new(),
        MockTokenService::new(),
    )
    .login(LoginCredentials {
        email: " ".into(),
        password: "secret1".into(),
    })
    .await
    .expect_err("missing");

    assert_eq!(err.message(), LOGIN_FIELDS_REQUIRED);
}

#[tokio::test]
async fn profile_of_vanished_user_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let caller = AuthenticatedUser {
        user_id: UserId::new(8),
        email: "gone@example.com".into(),
        is_admin: false,
    };
    let err = make_service(users, MockPasswordHasher::new(), MockTokenService::new())
        .profile(&caller)
        .await
        .expect_err("gone");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), USER_NOT_FOUND);
}

#[test]
fn authenticate_maps_rejected_tokens_to_unauthorized() {
    let mut tokens = MockTokenService::new();
    tokens
        .expect_verify()
        .times(1)
        .return_once(|_| Err(TokenServiceError::invalid("expired")));

    let err = make_service(MockUserRepository::new(), MockPasswordHasher::new(), tokens)
        .authenticate("abc")
        .expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_TOKEN);
}

#[tokio::test]
async fn ensure_admin_creates_admin_account_once() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(1).return_once(|_| Ok(None));
    users
        .expect_create()
        .withf(|new| new.is_admin)
        .times(1)
        .return_once(|new| Ok(user(1, &new.email, true)));

    let outcome = make_service(users, hashing(), MockTokenService::new())
        .ensure_admin(registration("admin@clickbeard.com", "admin123"))
        .await
        .expect("bootstrap");

    assert!(matches!(outcome, AdminBootstrap::Created(ref u) if u.is_admin));
}

#[tokio::test]
async fn ensure_admin_leaves_existing_account_alone() {
    let mut users = stored("hash");
    users.expect_create().times(0);

    let outcome = make_service(users, MockPasswordHasher::new(), MockTokenService::new())
        .ensure_admin(registration("admin@clickbeard.com", "admin123"))
        .await
        .expect("bootstrap");

    assert_eq!(outcome, AdminBootstrap::AlreadyPresent);
}

#[tokio::test]
async fn ensure_admin_treats_lost_race_as_present() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(1).return_once(|_| Ok(None));
    users
        .expect_create()
        .times(1)
        .return_once(|_| Err(UserRepositoryError::duplicate_email()));

    let outcome = make_service(users, hashing(), MockTokenService::new())
        .ensure_admin(registration("admin@clickbeard.com", "admin123"))
        .await
        .expect("bootstrap");

    assert_eq!(outcome, AdminBootstrap::AlreadyPresent);
}
