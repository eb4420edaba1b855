//! Bearer token authentication for HTTP handlers.
//!
//! Handlers take a [`Caller`] argument to require an authenticated user. The
//! extractor parses the `Authorization` header and asks the account service
//! to resolve the token, so no JWT details leak into the handlers.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};

use crate::domain::{AuthenticatedUser, Error};

use super::state::HttpState;

pub(crate) const TOKEN_MISSING: &str = "Token não fornecido";
pub(crate) const TOKEN_MALFORMED: &str = "Token mal formatado";

/// Authenticated identity resolved from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub AuthenticatedUser);

impl Caller {
    /// The resolved identity.
    #[must_use]
    pub fn user(&self) -> &AuthenticatedUser {
        &self.0
    }
}

/// Split `Bearer <token>` into its token.
///
/// The header must contain exactly two space separated parts and the scheme
/// is matched case-insensitively.
pub(crate) fn bearer_token(header: Option<&str>) -> Result<&str, Error> {
    let header = header.ok_or_else(|| Error::unauthorized(TOKEN_MISSING))?;
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(Error::unauthorized(TOKEN_MALFORMED)),
    }
}

fn authenticate(req: &HttpRequest) -> Result<Caller, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state not configured"))?;
    let header = match req.headers().get(AUTHORIZATION) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| Error::unauthorized(TOKEN_MALFORMED))?,
        ),
        None => None,
    };
    let token = bearer_token(header)?;
    state.accounts.authenticate(token).map(Caller)
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
