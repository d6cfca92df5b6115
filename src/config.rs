//! Store configuration from the environment.
//!
//! The connection string is read lazily, at the first acquisition attempt,
//! so importing or constructing the store never requires env vars.

use crate::error::ConfigError;

/// Environment variable holding the document store connection string
pub const MONGODB_URI_VAR: &str = "MONGODB_URI";

/// Environment variable overriding the database name
pub const MONGODB_DB_VAR: &str = "MONGODB_DB";

const DEFAULT_DATABASE: &str = "devevents";

/// Connection target for the document store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
}

impl StoreConfig {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
        }
    }

    /// Read the connection target from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `MONGODB_URI` is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let uri = std::env::var(MONGODB_URI_VAR)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar {
                var: MONGODB_URI_VAR,
            })?;

        let database = std::env::var(MONGODB_DB_VAR)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        Ok(Self { uri, database })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env mutation is process-global; this is the only test that touches
    // MONGODB_URI in the unit-test binary.
    #[test]
    fn from_env_requires_uri() {
        std::env::remove_var(MONGODB_URI_VAR);
        std::env::remove_var(MONGODB_DB_VAR);
        let err = StoreConfig::from_env().unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingVar {
                var: MONGODB_URI_VAR
            }
        );

        std::env::set_var(MONGODB_URI_VAR, "mongodb://localhost:27017");
        let config = StoreConfig::from_env().unwrap();
        assert_eq!(config.uri, "mongodb://localhost:27017");
        assert_eq!(config.database, DEFAULT_DATABASE);

        std::env::set_var(MONGODB_DB_VAR, "devevents_test");
        let config = StoreConfig::from_env().unwrap();
        assert_eq!(config.database, "devevents_test");

        std::env::remove_var(MONGODB_URI_VAR);
        std::env::remove_var(MONGODB_DB_VAR);
    }

    #[test]
    fn explicit_config() {
        let config = StoreConfig::new("mongodb://db.internal", "events");
        assert_eq!(config.uri, "mongodb://db.internal");
        assert_eq!(config.database, "events");
    }
}
