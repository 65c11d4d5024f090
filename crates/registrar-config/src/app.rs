use std::env;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Apply embedded migrations before serving.
    pub run_migrations: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            run_migrations: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let run_migrations = env::var("RUN_MIGRATIONS")
            .map(|s| !matches!(s.trim().to_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        Self {
            port,
            run_migrations,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert!(config.run_migrations);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
