//! Credential adapters: bcrypt password hashing and HS256 bearer tokens.

mod bcrypt_password_hasher;
mod jwt_token_service;
pub mod token_config;

pub use bcrypt_password_hasher::{BcryptPasswordHasher, DEFAULT_BCRYPT_COST};
pub use jwt_token_service::JwtTokenService;
pub use token_config::fingerprint::secret_fingerprint;
pub use token_config::{
    BuildMode, SECRET_MIN_LEN, TokenConfigError, TokenSettings, token_settings_from_env,
};
