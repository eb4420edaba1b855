//! Server settings loaded via OrthoConfig.

use std::net::SocketAddr;

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use clickbeard::domain::Registration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_ADMIN_NAME: &str = "Administrador";
const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Startup configuration. Every field maps to a `CLICKBEARD_*` variable.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLICKBEARD")]
pub struct ServerSettings {
    /// Listen address, `0.0.0.0:5000` when unset.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; falls back to `DATABASE_URL`.
    pub database_url: Option<String>,
    /// Pool size.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Apply pending migrations at startup; on unless set to `false`.
    pub run_migrations: Option<bool>,
    pub admin_name: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

/// Problems found while interpreting [`ServerSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid CLICKBEARD_BIND_ADDR '{value}': {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

impl ServerSettings {
    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Whether startup applies pending migrations.
    pub fn migrations_enabled(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// The configured database URL, if any.
    pub fn database_url<E: Env>(&self, env: &E) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| env.string(DATABASE_URL_ENV))
            .filter(|url| !url.trim().is_empty())
    }

    /// The administrator account to ensure at startup, when both email and
    /// password are configured.
    pub fn admin_registration(&self) -> Option<Registration> {
        let email = self.admin_email.clone()?;
        let password = self.admin_password.clone()?;
        Some(Registration {
            name: self
                .admin_name
                .clone()
                .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_owned()),
            email,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use mockable::{DefaultEnv, MockEnv};
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "CLICKBEARD_BIND_ADDR",
        "CLICKBEARD_DATABASE_URL",
        "CLICKBEARD_DB_MAX_CONNECTIONS",
        "CLICKBEARD_RUN_MIGRATIONS",
        "CLICKBEARD_ADMIN_NAME",
        "CLICKBEARD_ADMIN_EMAIL",
        "CLICKBEARD_ADMIN_PASSWORD",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("clickbeard")]).expect("config should load")
    }

    fn env_without_database_url() -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(|_| None);
        env
    }

    #[rstest]
    fn defaults_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:5000".parse::<SocketAddr>().expect("literal parses")
        );
        assert_eq!(settings.db_max_connections, 10);
        assert!(settings.migrations_enabled());
        assert!(settings.database_url(&env_without_database_url()).is_none());
        assert!(settings.admin_registration().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CLICKBEARD_BIND_ADDR", Some("127.0.0.1:8081".to_owned())),
            (
                "CLICKBEARD_DATABASE_URL",
                Some("postgres://localhost/clickbeard".to_owned()),
            ),
            ("CLICKBEARD_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("CLICKBEARD_RUN_MIGRATIONS", Some("false".to_owned())),
            ("CLICKBEARD_ADMIN_NAME", None),
            ("CLICKBEARD_ADMIN_EMAIL", Some("admin@clickbeard.com".to_owned())),
            ("CLICKBEARD_ADMIN_PASSWORD", Some("admin123".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr().expect("parses").port(), 8081);
        assert_eq!(settings.db_max_connections, 4);
        assert!(!settings.migrations_enabled());
        assert_eq!(
            settings.database_url(&env_without_database_url()).as_deref(),
            Some("postgres://localhost/clickbeard")
        );
        let admin = settings.admin_registration().expect("admin configured");
        assert_eq!(admin.name, DEFAULT_ADMIN_NAME);
        assert_eq!(admin.email, "admin@clickbeard.com");
    }

    #[rstest]
    fn database_url_falls_back_to_the_conventional_variable() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));
        let mut env = MockEnv::new();
        env.expect_string().returning(|name| {
            (name == DATABASE_URL_ENV).then(|| "postgres://db/clickbeard".to_owned())
        });

        let settings = load_from_empty_args();

        assert_eq!(
            settings.database_url(&env).as_deref(),
            Some("postgres://db/clickbeard")
        );
    }

    #[rstest]
    fn migrations_stay_on_when_only_the_database_is_configured() {
        let _guard = lock_env([
            ("CLICKBEARD_RUN_MIGRATIONS", None),
            (
                "CLICKBEARD_DATABASE_URL",
                Some("postgres://localhost/clickbeard".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.run_migrations, None);
        assert!(settings.migrations_enabled());
    }

    #[rstest]
    fn database_url_reads_the_process_environment() {
        let mut vars: Vec<(&str, Option<String>)> =
            VARS.iter().map(|name| (*name, None)).collect();
        vars.push((DATABASE_URL_ENV, Some("postgres://env/clickbeard".to_owned())));
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.database_url(&DefaultEnv::new()).as_deref(),
            Some("postgres://env/clickbeard")
        );
    }

    #[rstest]
    fn admin_needs_both_email_and_password() {
        let _guard = lock_env([
            ("CLICKBEARD_ADMIN_EMAIL", Some("admin@clickbeard.com".to_owned())),
            ("CLICKBEARD_ADMIN_PASSWORD", None),
        ]);

        assert!(load_from_empty_args().admin_registration().is_none());
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let _guard = lock_env([("CLICKBEARD_BIND_ADDR", Some("localhost".to_owned()))]);

        let err = load_from_empty_args().bind_addr().expect_err("no port");

        assert!(err.to_string().contains("localhost"));
    }
}
