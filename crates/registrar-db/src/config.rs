use std::env;

use anyhow::{Context, bail};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Where the pool connects to.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
        ssl_mode: String,
    },
}

// Credentials stay out of logs.
impl std::fmt::Debug for DatabaseTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(_) => f.write_str("Url(<redacted>)"),
            Self::Parts {
                host,
                port,
                database,
                ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("database", database)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub target: DatabaseTarget,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves the configuration through `lookup`, which returns the value
    /// of a variable or `None` when it is unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let target = match get("DATABASE_URL") {
            Some(url) => DatabaseTarget::Url(url),
            None => {
                let (Some(host), Some(port), Some(user), Some(database)) = (
                    get("DATABASE_HOST"),
                    get("DATABASE_PORT"),
                    get("DATABASE_USER"),
                    get("DATABASE_NAME"),
                ) else {
                    bail!("DATABASE_URL or DATABASE_* environment variables are required");
                };
                let port = port
                    .parse::<u16>()
                    .with_context(|| format!("DATABASE_PORT is not a valid port: {port}"))?;
                DatabaseTarget::Parts {
                    host,
                    port,
                    user,
                    password: lookup("DATABASE_PASSWORD").unwrap_or_default(),
                    database,
                    ssl_mode: get("DATABASE_SSLMODE").unwrap_or_else(|| "disable".to_string()),
                }
            }
        };

        let max_connections = get("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Ok(Self {
            target,
            max_connections,
        })
    }

    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        match &self.target {
            DatabaseTarget::Url(url) => url
                .parse::<PgConnectOptions>()
                .context("DATABASE_URL is not a valid postgres URL"),
            DatabaseTarget::Parts {
                host,
                port,
                user,
                password,
                database,
                ssl_mode,
            } => {
                let ssl_mode = ssl_mode
                    .parse::<PgSslMode>()
                    .with_context(|| format!("unknown DATABASE_SSLMODE: {ssl_mode}"))?;
                Ok(PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(user)
                    .password(password)
                    .database(database)
                    .ssl_mode(ssl_mode))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_url_wins_over_parts() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://u:p@db:5432/akademik"),
            ("DATABASE_HOST", "ignored"),
        ]))
        .unwrap();
        assert!(matches!(config.target, DatabaseTarget::Url(_)));
        assert_eq!(config.max_connections, 10);
        assert!(config.connect_options().is_ok());
    }

    #[test]
    fn test_parts_default_sslmode() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            ("DATABASE_HOST", "localhost"),
            ("DATABASE_PORT", "5432"),
            ("DATABASE_USER", "postgres"),
            ("DATABASE_NAME", "akademik"),
        ]))
        .unwrap();
        match &config.target {
            DatabaseTarget::Parts { ssl_mode, password, .. } => {
                assert_eq!(ssl_mode, "disable");
                assert!(password.is_empty());
            }
            other => panic!("unexpected target {other:?}"),
        }
        assert!(config.connect_options().is_ok());
    }

    #[test]
    fn test_missing_parts_is_error() {
        let err = DatabaseConfig::from_lookup(lookup(&[
            ("DATABASE_HOST", "localhost"),
            ("DATABASE_PORT", "5432"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port_is_error() {
        let result = DatabaseConfig::from_lookup(lookup(&[
            ("DATABASE_HOST", "localhost"),
            ("DATABASE_PORT", "not-a-port"),
            ("DATABASE_USER", "postgres"),
            ("DATABASE_NAME", "akademik"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_url() {
        let target = DatabaseTarget::Url("postgres://u:secret@db/akademik".into());
        assert!(!format!("{target:?}").contains("secret"));
    }
}
