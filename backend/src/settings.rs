//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `POOLS_*` environment variables and an
//! optional configuration file, in OrthoConfig's usual precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::{DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_CONNECTIONS};

/// Listener address used when none is configured.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);

/// Errors raised when settings are structurally valid but unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("POOLS_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("POOLS_DB_MAX_CONNECTIONS must be greater than zero")]
    ZeroMaxConnections,
}

/// Start-up configuration for the pools server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "POOLS")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection before failing.
    pub db_checkout_timeout_secs: Option<u64>,
    /// Apply embedded migrations before serving traffic. Defaults to on.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    /// Return the database URL, which has no default.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections {
            Some(0) => Err(SettingsError::ZeroMaxConnections),
            Some(value) => Ok(value),
            None => Ok(DEFAULT_MAX_CONNECTIONS),
        }
    }

    pub fn db_checkout_timeout(&self) -> Duration {
        self.db_checkout_timeout_secs
            .map_or(DEFAULT_CHECKOUT_TIMEOUT, Duration::from_secs)
    }

    /// Whether start-up applies pending migrations; on unless disabled.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "POOLS_DATABASE_URL",
        "POOLS_BIND_ADDR",
        "POOLS_DB_MAX_CONNECTIONS",
        "POOLS_DB_CHECKOUT_TIMEOUT_SECS",
        "POOLS_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("pools")]).expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        );
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(settings.db_max_connections(), Ok(DEFAULT_MAX_CONNECTIONS));
        assert_eq!(settings.db_checkout_timeout(), DEFAULT_CHECKOUT_TIMEOUT);
        assert!(settings.run_migrations());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "POOLS_DATABASE_URL",
                Some("postgres://pools@localhost/pools".to_owned()),
            ),
            ("POOLS_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("POOLS_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("POOLS_DB_CHECKOUT_TIMEOUT_SECS", Some("5".to_owned())),
            ("POOLS_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url(),
            Ok("postgres://pools@localhost/pools")
        );
        assert_eq!(settings.bind_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(settings.db_max_connections(), Ok(4));
        assert_eq!(settings.db_checkout_timeout(), Duration::from_secs(5));
        assert!(!settings.run_migrations());
    }

    #[rstest]
    #[case("0", Err(SettingsError::ZeroMaxConnections))]
    #[case("25", Ok(25))]
    fn max_connections_must_be_positive(
        #[case] raw: &str,
        #[case] expected: Result<u32, SettingsError>,
    ) {
        let mut vars = cleared();
        vars.retain(|(name, _)| *name != "POOLS_DB_MAX_CONNECTIONS");
        vars.push(("POOLS_DB_MAX_CONNECTIONS", Some(raw.to_owned())));
        let _guard = lock_env(vars);

        assert_eq!(load_from_empty_args().db_max_connections(), expected);
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("true"), true)]
    #[case(Some("false"), false)]
    fn migrations_run_unless_disabled(#[case] raw: Option<&str>, #[case] expected: bool) {
        let mut vars = cleared();
        vars.retain(|(name, _)| *name != "POOLS_RUN_MIGRATIONS");
        vars.push(("POOLS_RUN_MIGRATIONS", raw.map(str::to_owned)));
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(settings.run_migrations, raw.map(|value| value == "true"));
        assert_eq!(settings.run_migrations(), expected);
    }

    #[rstest]
    fn blank_database_url_counts_as_missing() {
        let mut vars = cleared();
        vars.retain(|(name, _)| *name != "POOLS_DATABASE_URL");
        vars.push(("POOLS_DATABASE_URL", Some("   ".to_owned())));
        let _guard = lock_env(vars);

        assert_eq!(
            load_from_empty_args().database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        );
    }
}
