//! Runtime configuration from the environment.

use std::path::Path;
use std::time::Duration;

use crate::constants::{
    CREATE_INDEX_TIMEOUT, DB_MAX_CONNECTIONS_DEFAULT, ENV_CREATE_INDEX_TIMEOUT_MS,
    ENV_DATABASE_URL, ENV_DB_MAX_CONNECTIONS,
};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to load env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Postgres URL; `None` selects the in-memory backend
    pub database_url: Option<String>,
    /// Connection pool size
    pub max_connections: u32,
    /// Time allowed for unique index creation
    pub create_index_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: DB_MAX_CONNECTIONS_DEFAULT,
            create_index_timeout: CREATE_INDEX_TIMEOUT,
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    ///
    /// # Errors
    /// Returns an error when a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration from a specific env file, ignoring the process
    /// environment.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or a value is invalid.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        let vars: Vec<(String, String)> =
            dotenvy::from_path_iter(path)?.collect::<Result<_, _>>()?;
        Self::from_lookup(|var| {
            vars.iter()
                .find(|(key, _)| key == var)
                .map(|(_, value)| value.clone())
        })
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup(ENV_DATABASE_URL).and_then(non_blank);

        let max_connections = match lookup(ENV_DB_MAX_CONNECTIONS) {
            Some(raw) => parse_positive(ENV_DB_MAX_CONNECTIONS, &raw)?,
            None => defaults.max_connections,
        };

        let create_index_timeout = match lookup(ENV_CREATE_INDEX_TIMEOUT_MS) {
            Some(raw) => Duration::from_millis(u64::from(parse_positive(
                ENV_CREATE_INDEX_TIMEOUT_MS,
                &raw,
            )?)),
            None => defaults.create_index_timeout,
        };

        Ok(Self {
            database_url,
            max_connections,
            create_index_timeout,
        })
    }

    /// Replace the database URL with an explicit one, such as a command-line
    /// flag. A missing or blank URL keeps the current value.
    #[must_use]
    pub fn override_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.and_then(non_blank) {
            self.database_url = Some(url);
        }
        self
    }
}

fn non_blank(url: String) -> Option<String> {
    if url.trim().is_empty() {
        None
    } else {
        Some(url)
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
        reason,
    };
    let value: u32 = raw.trim().parse().map_err(|e| invalid(format!("{e}")))?;
    if value == 0 {
        return Err(invalid("must be positive".to_string()));
    }
    Ok(value)
}
