//! Load shape configuration: how many workers, how many sessions each, how
//! many probes per session and how long to pause in between.

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::Serialize;
use std::time::Duration;

/// Workload configuration
#[derive(Debug, Clone, Serialize)]
pub struct WorkloadConfig {
    /// Number of concurrent workers
    pub workers: usize,

    /// Sessions opened by each worker, one after the other
    pub batch_size: u64,

    /// Mean pause between two sessions of the same worker (zero disables it)
    #[serde(serialize_with = "crate::domains::utils::serialize_duration_millis")]
    pub batch_pacing: Duration,

    /// Probe pairs issued inside each session
    pub loop_size: u64,

    /// Mean pause between two probe pairs (zero disables it)
    #[serde(serialize_with = "crate::domains::utils::serialize_duration_millis")]
    pub loop_pacing: Duration,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            batch_size: default_batch_size(),
            batch_pacing: default_batch_pacing(),
            loop_size: default_loop_size(),
            loop_pacing: default_loop_pacing(),
        }
    }
}

impl Validatable for WorkloadConfig {
    fn validate(&self) -> ConfigResult<()> {
        // batch_size, loop_size and both pacings may legitimately be zero
        validate_positive(self.workers, "workers", self.domain_name())
    }

    fn domain_name(&self) -> &'static str {
        "workload"
    }
}

fn default_workers() -> usize {
    1
}

fn default_batch_size() -> u64 {
    1
}

fn default_batch_pacing() -> Duration {
    Duration::from_millis(100)
}

fn default_loop_size() -> u64 {
    1
}

fn default_loop_pacing() -> Duration {
    Duration::from_millis(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_defaults() {
        let config = WorkloadConfig::default();
        assert_eq!(config.workers, 1);
        assert_eq!(config.batch_size, 1);
        assert_eq!(config.batch_pacing, Duration::from_millis(100));
        assert_eq!(config.loop_size, 1);
        assert_eq!(config.loop_pacing, Duration::from_millis(10));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = WorkloadConfig {
            workers: 0,
            ..WorkloadConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_sizes_and_pacing_accepted() {
        let config = WorkloadConfig {
            workers: 4,
            batch_size: 0,
            batch_pacing: Duration::ZERO,
            loop_size: 0,
            loop_pacing: Duration::ZERO,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pacing_serializes_as_millis() {
        let json = serde_json::to_value(WorkloadConfig::default()).unwrap();
        assert_eq!(json["batch_pacing"], 100);
        assert_eq!(json["loop_pacing"], 10);
    }
}
