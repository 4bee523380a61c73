//! Configuration loading and environment variable handling

use crate::domains::LoadConfig;
use crate::error::{ConfigError, ConfigResult};
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "IMMULOAD".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from defaults and environment variables, validated
    pub fn from_env(&self) -> ConfigResult<LoadConfig> {
        let config = self.from_env_unvalidated()?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load defaults plus environment overrides without validating, so that
    /// callers can layer further overrides (command line flags) on top and
    /// validate once at the end.
    pub fn from_env_unvalidated(&self) -> ConfigResult<LoadConfig> {
        let mut config = LoadConfig::default();
        self.apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut LoadConfig) -> ConfigResult<()> {
        self.apply_connection_overrides(&mut config.connection)?;
        self.apply_workload_overrides(&mut config.workload)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    /// Apply connection config overrides
    fn apply_connection_overrides(
        &self,
        config: &mut crate::domains::connection::ConnectionConfig,
    ) -> ConfigResult<()> {
        if let Ok(address) = self.get_env_var("ADDR") {
            config.address = address;
        }

        if let Some(port) = self.parse_env_var("PORT")? {
            config.port = port;
        }

        if let Ok(username) = self.get_env_var("USER") {
            config.username = username;
        }

        if let Ok(password) = self.get_env_var("PASS") {
            config.password = password;
        }

        if let Ok(database) = self.get_env_var("DB") {
            config.set_database(database);
        }

        if let Some(millis) = self.parse_env_var::<u64>("CONNECT_TIMEOUT_MS")? {
            config.connect_timeout = Duration::from_millis(millis);
        }

        Ok(())
    }

    /// Apply workload config overrides
    fn apply_workload_overrides(
        &self,
        config: &mut crate::domains::workload::WorkloadConfig,
    ) -> ConfigResult<()> {
        if let Some(workers) = self.parse_env_var("WORKERS")? {
            config.workers = workers;
        }

        if let Some(batch_size) = self.parse_env_var("BATCH_SIZE")? {
            config.batch_size = batch_size;
        }

        if let Some(millis) = self.parse_env_var::<u64>("BATCH_WAIT_MS")? {
            config.batch_pacing = Duration::from_millis(millis);
        }

        if let Some(loop_size) = self.parse_env_var("LOOP_SIZE")? {
            config.loop_size = loop_size;
        }

        if let Some(millis) = self.parse_env_var::<u64>("LOOP_WAIT_MS")? {
            config.loop_pacing = Duration::from_millis(millis);
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Some(include_location) = self.parse_env_var("LOG_LOCATION")? {
            config.include_location = include_location;
        }

        Ok(())
    }

    /// Parse an optional environment variable, reporting malformed values
    fn parse_env_var<T>(&self, name: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_env_var(name) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e))),
            Err(_) => Ok(None),
        }
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
