//! Configuration management for immuload
//!
//! The configuration is split by functional domain (connection, workload,
//! logging), validated once after every source has been applied, and then
//! treated as read-only for the rest of the process lifetime.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    connection::ConnectionConfig,
    logging::{LogLevel, LoggingConfig},
    workload::WorkloadConfig,
    LoadConfig,
};
