//! Unit tests for token configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_secret() -> String {
    "s".repeat(SECRET_MIN_LEN)
}

fn expect_error(
    result: Result<TokenSettings, TokenConfigError>,
    label: &str,
) -> TokenConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
fn release_requires_a_secret() {
    let env = mock_env(HashMap::new());
    let err = expect_error(
        token_settings_from_env(&env, BuildMode::Release),
        "expected missing secret to fail",
    );
    assert_eq!(err, TokenConfigError::MissingEnv { name: SECRET_ENV });
}

#[rstest]
fn release_rejects_short_secret() {
    let env = mock_env(HashMap::from([(SECRET_ENV, "short".to_string())]));
    let err = expect_error(
        token_settings_from_env(&env, BuildMode::Release),
        "expected short secret to fail",
    );
    assert_eq!(
        err,
        TokenConfigError::SecretTooShort {
            length: 5,
            min_len: SECRET_MIN_LEN,
        }
    );
}

#[rstest]
fn release_rejects_ephemeral_opt_in() {
    let env = mock_env(HashMap::from([
        (SECRET_ENV, release_secret()),
        (ALLOW_EPHEMERAL_ENV, "1".to_string()),
    ]));
    let err = expect_error(
        token_settings_from_env(&env, BuildMode::Release),
        "expected ephemeral opt-in to fail",
    );
    assert_eq!(err, TokenConfigError::EphemeralNotAllowed);
}

#[rstest]
fn release_accepts_explicit_settings() {
    let env = mock_env(HashMap::from([
        (SECRET_ENV, release_secret()),
        (EXPIRES_IN_ENV, "24h".to_string()),
        (ALLOW_EPHEMERAL_ENV, "no".to_string()),
    ]));
    let settings =
        token_settings_from_env(&env, BuildMode::Release).expect("settings should be valid");

    assert_eq!(settings.secret.as_slice(), release_secret().as_bytes());
    assert_eq!(settings.ttl, Duration::from_secs(24 * 60 * 60));
}

#[rstest]
fn release_rejects_unparseable_ttl() {
    let env = mock_env(HashMap::from([
        (SECRET_ENV, release_secret()),
        (EXPIRES_IN_ENV, "soon".to_string()),
    ]));
    let err = expect_error(
        token_settings_from_env(&env, BuildMode::Release),
        "expected bad ttl to fail",
    );
    assert!(matches!(
        err,
        TokenConfigError::InvalidEnv {
            name: EXPIRES_IN_ENV,
            ..
        }
    ));
}

#[rstest]
fn debug_generates_ephemeral_secret_and_defaults() {
    let env = mock_env(HashMap::new());
    let settings =
        token_settings_from_env(&env, BuildMode::Debug).expect("debug should fall back");

    assert_eq!(settings.secret.len(), EPHEMERAL_SECRET_LEN);
    assert_eq!(settings.ttl, DEFAULT_TTL);
}

#[rstest]
fn debug_accepts_short_secret_and_bad_ttl() {
    let env = mock_env(HashMap::from([
        (SECRET_ENV, "dev".to_string()),
        (EXPIRES_IN_ENV, "later".to_string()),
        (ALLOW_EPHEMERAL_ENV, "perhaps".to_string()),
    ]));
    let settings =
        token_settings_from_env(&env, BuildMode::Debug).expect("debug should be lenient");

    assert_eq!(settings.secret.as_slice(), b"dev");
    assert_eq!(settings.ttl, DEFAULT_TTL);
}

#[rstest]
fn debug_output_redacts_secret() {
    let settings = TokenSettings {
        secret: Zeroizing::new(b"top-secret".to_vec()),
        ttl: DEFAULT_TTL,
    };
    let rendered = format!("{settings:?}");
    assert!(!rendered.contains("top-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[rstest]
#[case("3600", Some(3600))]
#[case("45s", Some(45))]
#[case("30m", Some(30 * 60))]
#[case("12H", Some(12 * 60 * 60))]
#[case("7d", Some(7 * 24 * 60 * 60))]
#[case(" 2h ", Some(2 * 60 * 60))]
#[case("0", None)]
#[case("5w", None)]
#[case("h", None)]
#[case("", None)]
#[case("-1h", None)]
fn durations_parse(#[case] raw: &str, #[case] expected: Option<u64>) {
    assert_eq!(parse_duration(raw), expected.map(Duration::from_secs));
}
