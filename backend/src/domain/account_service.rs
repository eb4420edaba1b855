//! Account service: registration, login and bearer authentication.
//!
//! Password hashing and token signing stay behind driven ports so the domain
//! never depends on bcrypt or JWT crates.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountService, AdminBootstrap, PasswordHasher, PasswordHasherError, TokenService,
    TokenServiceError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AuthSession, AuthenticatedUser, Error, LoginCredentials, MIN_PASSWORD_LEN, NewUser,
    Registration, User, normalise_email,
};

pub(crate) const REGISTRATION_FIELDS_REQUIRED: &str = "Todos os campos são obrigatórios";
pub(crate) const PASSWORD_TOO_SHORT: &str = "A senha deve ter pelo menos 6 caracteres";
pub(crate) const EMAIL_TAKEN: &str = "Email já cadastrado";
pub(crate) const LOGIN_FIELDS_REQUIRED: &str = "Email e senha são obrigatórios";
pub(crate) const BAD_CREDENTIALS: &str = "Email ou senha incorretos";
pub(crate) const USER_NOT_FOUND: &str = "Usuário não encontrado";
pub(crate) const INVALID_TOKEN: &str = "Token inválido";

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail => Error::conflict(EMAIL_TAKEN),
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenServiceError) -> Error {
    match error {
        TokenServiceError::Issue { message } => {
            Error::internal(format!("token issue failed: {message}"))
        }
        TokenServiceError::Invalid { .. } => Error::unauthorized(INVALID_TOKEN),
    }
}

/// Validated registration fields ready for hashing.
struct AccountDraft {
    name: String,
    email: String,
    password: String,
}

impl TryFrom<Registration> for AccountDraft {
    type Error = Error;

    fn try_from(registration: Registration) -> Result<Self, Self::Error> {
        let name = registration.name.trim().to_owned();
        let email = normalise_email(&registration.email);
        if name.is_empty() || email.is_empty() || registration.password.is_empty() {
            return Err(Error::invalid_request(REGISTRATION_FIELDS_REQUIRED));
        }
        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::invalid_request(PASSWORD_TOO_SHORT));
        }
        Ok(Self {
            name,
            email,
            password: registration.password,
        })
    }
}

/// Account service implementing [`AccountService`].
#[derive(Clone)]
pub struct AccountServiceImpl<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> AccountServiceImpl<U, H, T> {
    /// Create a new service from its driven ports.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

impl<U, H, T> AccountServiceImpl<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn email_registered(&self, email: &str) -> Result<bool, Error> {
        Ok(self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_error)?
            .is_some())
    }

    async fn store(&self, draft: AccountDraft, is_admin: bool) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(&draft.password)
            .await
            .map_err(map_hasher_error)?;
        self.users
            .create(&NewUser {
                name: draft.name,
                email: draft.email,
                password_hash,
                is_admin,
            })
            .await
            .map_err(map_user_error)
    }

    fn session(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&user).map_err(map_token_error)?;
        Ok(AuthSession { user, token })
    }
}

#[async_trait]
impl<U, H, T> AccountService for AccountServiceImpl<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let draft = AccountDraft::try_from(registration)?;
        if self.email_registered(&draft.email).await? {
            return Err(Error::conflict(EMAIL_TAKEN));
        }
        let user = self.store(draft, false).await?;
        info!(user_id = %user.id, "account registered");
        self.session(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let email = normalise_email(&credentials.email);
        if email.is_empty() || credentials.password.is_empty() {
            return Err(Error::invalid_request(LOGIN_FIELDS_REQUIRED));
        }
        let Some(stored) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        };
        let matches = self
            .hasher
            .verify(&credentials.password, &stored.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !matches {
            warn!(user_id = %stored.user.id, "login rejected");
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        }
        self.session(stored.user)
    }

    async fn profile(&self, caller: &AuthenticatedUser) -> Result<User, Error> {
        self.users
            .find_by_id(caller.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error> {
        self.tokens.verify(token).map_err(map_token_error)
    }

    async fn ensure_admin(&self, registration: Registration) -> Result<AdminBootstrap, Error> {
        let draft = AccountDraft::try_from(registration)?;
        if self.email_registered(&draft.email).await? {
            return Ok(AdminBootstrap::AlreadyPresent);
        }
        match self.store(draft, true).await {
            Ok(user) => {
                info!(user_id = %user.id, "administrator account created");
                Ok(AdminBootstrap::Created(user))
            }
            // Another instance won the race.
            Err(err) if err.message() == EMAIL_TAKEN => Ok(AdminBootstrap::AlreadyPresent),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
