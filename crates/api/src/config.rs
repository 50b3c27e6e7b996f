/// Which [`CustomerStore`](tgcrm_core::store::CustomerStore) back end to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process store; contents are lost on restart.
    Memory,
    /// PostgreSQL store at the given connection URL.
    Postgres { database_url: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// A configuration variable had an unusable value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub store_backend: StoreBackend,
    /// Insert the demo customers at startup (default: `false`).
    pub seed_demo_customers: bool,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `STORE_BACKEND`        | `memory`                   |
    /// | `DATABASE_URL`         | required for `postgres`    |
    /// | `SEED_DEMO_CUSTOMERS`  | `false`                    |
    /// | `LOG_FORMAT`           | `text`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");

        let port = var("PORT", "3000");
        let port: u16 = port.parse().map_err(|_| ConfigError::Invalid {
            var: "PORT",
            expected: "a valid u16",
            value: port.clone(),
        })?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let timeout = var("REQUEST_TIMEOUT_SECS", "30");
        let request_timeout_secs: u64 = timeout.parse().map_err(|_| ConfigError::Invalid {
            var: "REQUEST_TIMEOUT_SECS",
            expected: "a valid u64",
            value: timeout.clone(),
        })?;

        let store_backend = match var("STORE_BACKEND", "memory").as_str() {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    var: "STORE_BACKEND",
                    expected: "one of: memory, postgres",
                    value: other.to_string(),
                })
            }
        };

        let seed = var("SEED_DEMO_CUSTOMERS", "false");
        let seed_demo_customers = match seed.as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => {
                return Err(ConfigError::Invalid {
                    var: "SEED_DEMO_CUSTOMERS",
                    expected: "true or false",
                    value: seed.clone(),
                })
            }
        };

        let log_format = match var("LOG_FORMAT", "text").as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    expected: "one of: text, json",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store_backend,
            seed_demo_customers,
            log_format,
        })
    }
}
