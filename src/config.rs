//! Configuration types.

use crate::error::ConfigError;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Service name for identification.
    pub name: String,
    /// Source tag stamped onto every recorded lead.
    pub lead_source: String,
    /// HTTP port the REST surface binds to.
    pub port: u16,
    /// Path of the local database file.
    pub db_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "fitgate".to_string(),
            lead_source: "onboarding-chat".to_string(),
            port: 8080,
            db_path: "./data/fitgate.db".to_string(),
        }
    }
}

impl AppConfig {
    /// Build a config from environment variables, falling back to defaults.
    ///
    /// Recognized: `FITGATE_PORT`, `FITGATE_DB_PATH`, `FITGATE_LEAD_SOURCE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("FITGATE_PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "FITGATE_PORT".to_string(),
                message: format!("'{port}' is not a valid port number"),
            })?;
        }
        if let Ok(path) = std::env::var("FITGATE_DB_PATH") {
            config.db_path = path;
        }
        if let Ok(source) = std::env::var("FITGATE_LEAD_SOURCE") {
            config.lead_source = source;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.name, "fitgate");
        assert_eq!(config.lead_source, "onboarding-chat");
        assert_eq!(config.port, 8080);
    }
}
