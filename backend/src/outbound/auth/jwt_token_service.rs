//! HS256 JSON Web Token adapter for the [`TokenService`] port.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenService, TokenServiceError};
use crate::domain::{AuthenticatedUser, User, UserId};

use super::TokenSettings;

/// Claims carried by every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    id: i32,
    email: String,
    is_admin: bool,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Create a token service from a raw secret.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
            clock,
        }
    }

    /// Create a token service from validated settings.
    #[must_use]
    pub fn from_settings(settings: &TokenSettings, clock: Arc<dyn Clock>) -> Self {
        Self::new(&settings.secret, settings.ttl, clock)
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock below.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation
    }

    fn ttl_seconds(&self) -> i64 {
        i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<String, TokenServiceError> {
        let iat = self.clock.utc().timestamp();
        let claims = Claims {
            id: user.id.get(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            iat,
            exp: iat.saturating_add(self.ttl_seconds()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenServiceError::issue(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenServiceError> {
        let claims = decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|err| TokenServiceError::invalid(err.to_string()))?
            .claims;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenServiceError::invalid("token expired"));
        }
        Ok(AuthenticatedUser {
            user_id: UserId::new(claims.id),
            email: claims.email,
            is_admin: claims.is_admin,
        })
    }
}
