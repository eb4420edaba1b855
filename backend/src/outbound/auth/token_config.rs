//! Bearer token configuration parsing and validation.
//!
//! Reads the JWT signing secret and lifetime from the environment. Release
//! builds insist on an explicit secret of reasonable length; debug builds
//! fall back to an ephemeral random secret and warn.

use std::time::Duration;

use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

pub mod fingerprint;

pub(crate) const SECRET_ENV: &str = "JWT_SECRET";
pub(crate) const EXPIRES_IN_ENV: &str = "JWT_EXPIRES_IN";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "JWT_ALLOW_EPHEMERAL";
/// Minimum secret length accepted in release builds, in bytes.
pub const SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;
const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const DURATION_EXPECTED: &str = "<seconds>|<n>s|<n>m|<n>h|<n>d";

/// Build mode for token configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings.
    Debug,
    /// Release builds require an explicit secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clickbeard::outbound::auth::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated token settings.
pub struct TokenSettings {
    /// HMAC signing secret; wiped on drop.
    pub secret: Zeroizing<Vec<u8>>,
    /// How long issued tokens stay valid.
    pub ttl: Duration,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TokenConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The secret is too short for release builds.
    #[error("{SECRET_ENV} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
    /// Release builds must not allow ephemeral secrets.
    #[error("{ALLOW_EPHEMERAL_ENV} must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build token settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use clickbeard::outbound::auth::{BuildMode, token_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET" => Some("a".repeat(48)),
///     "JWT_EXPIRES_IN" => Some("12h".to_string()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release).expect("valid");
/// assert_eq!(settings.ttl.as_secs(), 12 * 60 * 60);
/// ```
///
/// # Errors
///
/// Returns [`TokenConfigError`] when release builds lack a usable secret or
/// a variable cannot be parsed.
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let secret = secret_from_env(env, mode, allow_ephemeral)?;
    let ttl = ttl_from_env(env, mode)?;
    Ok(TokenSettings { secret, ttl })
}

/// Return the default in debug builds (after logging) and the error otherwise.
fn debug_warn_or_error<T>(
    mode: BuildMode,
    default: T,
    error: TokenConfigError,
    log: impl FnOnce(),
) -> Result<T, TokenConfigError> {
    if mode.is_debug() {
        log();
        Ok(default)
    } else {
        Err(error)
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(true) if mode.is_debug() => Ok(true),
        Some(true) => Err(TokenConfigError::EphemeralNotAllowed),
        Some(false) => Ok(false),
        None => debug_warn_or_error(
            mode,
            false,
            TokenConfigError::InvalidEnv {
                name: ALLOW_EPHEMERAL_ENV,
                value: value.clone(),
                expected: BOOL_EXPECTED,
            },
            || warn!(value = %value, "invalid JWT_ALLOW_EPHEMERAL; defaulting to disabled"),
        ),
    }
}

fn secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Zeroizing<Vec<u8>>, TokenConfigError> {
    match env.string(SECRET_ENV) {
        Some(value) if !value.is_empty() => {
            let secret = Zeroizing::new(value.into_bytes());
            let length = secret.len();
            if mode == BuildMode::Release && length < SECRET_MIN_LEN {
                return Err(TokenConfigError::SecretTooShort {
                    length,
                    min_len: SECRET_MIN_LEN,
                });
            }
            Ok(secret)
        }
        _ if mode.is_debug() || allow_ephemeral => {
            warn!("JWT_SECRET not set; using temporary signing secret (dev only)");
            Ok(ephemeral_secret())
        }
        _ => Err(TokenConfigError::MissingEnv { name: SECRET_ENV }),
    }
}

fn ephemeral_secret() -> Zeroizing<Vec<u8>> {
    let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, TokenConfigError> {
    let Some(value) = env.string(EXPIRES_IN_ENV) else {
        return Ok(DEFAULT_TTL);
    };
    match parse_duration(&value) {
        Some(ttl) => Ok(ttl),
        None => debug_warn_or_error(
            mode,
            DEFAULT_TTL,
            TokenConfigError::InvalidEnv {
                name: EXPIRES_IN_ENV,
                value: value.clone(),
                expected: DURATION_EXPECTED,
            },
            || warn!(value = %value, "invalid JWT_EXPIRES_IN; defaulting to 7d"),
        ),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Parse `3600`, `45s`, `30m`, `12h` or `7d`. Zero is rejected.
pub(crate) fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (digits, unit) = match value.char_indices().last()? {
        (idx, c) if c.is_ascii_alphabetic() => (&value[..idx], c.to_ascii_lowercase()),
        _ => (value, 's'),
    };
    let amount: u64 = digits.parse().ok()?;
    let seconds = match unit {
        's' => amount,
        'm' => amount.checked_mul(60)?,
        'h' => amount.checked_mul(60 * 60)?,
        'd' => amount.checked_mul(24 * 60 * 60)?,
        _ => return None,
    };
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests;
