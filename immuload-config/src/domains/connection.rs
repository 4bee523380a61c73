//! Remote service connection configuration

use crate::error::ConfigResult;
use crate::validation::{
    validate_port_range, validate_positive, validate_required_string, Validatable,
};
use serde::Serialize;
use std::time::Duration;

/// Where to connect and how to authenticate
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionConfig {
    /// Host name or IP address of the service
    pub address: String,

    /// gRPC port of the service
    pub port: u16,

    /// Username used to log in
    pub username: String,

    /// Password used to log in
    #[serde(skip_serializing)]
    pub password: String,

    /// Database to select after login, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Upper bound on establishing the transport connection
    #[serde(serialize_with = "crate::domains::utils::serialize_duration_millis")]
    pub connect_timeout: Duration,
}

impl ConnectionConfig {
    /// Set the database name, treating an empty or blank name as "none"
    pub fn set_database(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.database = if name.trim().is_empty() {
            None
        } else {
            Some(name)
        };
    }

    /// Database to select, if one is configured
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            username: default_username(),
            password: default_password(),
            database: None,
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Validatable for ConnectionConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.address, "address", self.domain_name())?;
        validate_port_range(self.port, "port", self.domain_name())?;
        validate_required_string(&self.username, "username", self.domain_name())?;
        validate_positive(
            self.connect_timeout.as_millis(),
            "connect_timeout",
            self.domain_name(),
        )?;

        if let Some(ref database) = self.database {
            if database.trim().is_empty() {
                return Err(self.validation_error("database name cannot be blank when set"));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "connection"
    }
}

// Default value functions
fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3322
}

fn default_username() -> String {
    "immudb".to_string()
}

fn default_password() -> String {
    "immudb".to_string()
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}
