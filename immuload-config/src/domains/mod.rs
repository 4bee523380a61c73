//! Domain-specific configuration modules

pub mod connection;
pub mod logging;
pub mod utils;
pub mod workload;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::Serialize;

/// Complete load generator configuration combining all domains
#[derive(Debug, Clone, Serialize, Default)]
pub struct LoadConfig {
    /// Remote service connection and credentials
    pub connection: connection::ConnectionConfig,

    /// Shape of the generated load
    pub workload: workload::WorkloadConfig,

    /// Logging configuration
    pub logging: logging::LoggingConfig,
}

impl LoadConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.connection.validate()?;
        self.workload.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Effective configuration as a single JSON line, credentials excluded
    pub fn summary(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "<unserializable config>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LoadConfig::default().validate_all().is_ok());
    }

    #[test]
    fn test_summary_mentions_domains_but_not_password() {
        let summary = LoadConfig::default().summary();
        assert!(summary.contains("\"connection\""));
        assert!(summary.contains("\"workload\""));
        assert!(summary.contains("\"port\":3322"));
        assert!(!summary.contains("password"));
    }

    #[test]
    fn test_summary_reflects_overrides() {
        let mut config = LoadConfig::default();
        config.connection.set_database("ledger");
        config.connection.connect_timeout = std::time::Duration::from_millis(2500);
        config.logging.level = logging::LogLevel::Debug;
        config.logging.include_location = false;

        let summary: serde_json::Value = serde_json::from_str(&config.summary()).unwrap();
        assert_eq!(summary["connection"]["database"], "ledger");
        assert_eq!(summary["connection"]["connect_timeout"], 2500);
        assert_eq!(summary["logging"]["level"], "debug");
        assert_eq!(summary["logging"]["include_location"], false);
    }
}
