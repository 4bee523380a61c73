//! Integration tests for immuload-config

use immuload_config::domains::logging::LogLevel;
use immuload_config::*;
use std::time::Duration;
use temp_env::with_vars;

#[test]
fn test_default_config_validation() {
    let config = LoadConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("IMMULOAD_ADDR", Some("db.internal")),
        ("IMMULOAD_PORT", Some("4455")),
        ("IMMULOAD_USER", Some("loader")),
        ("IMMULOAD_PASS", Some("secret")),
        ("IMMULOAD_DB", Some("ledger")),
        ("IMMULOAD_WORKERS", Some("16")),
        ("IMMULOAD_BATCH_SIZE", Some("20")),
        ("IMMULOAD_BATCH_WAIT_MS", Some("250")),
        ("IMMULOAD_LOOP_SIZE", Some("7")),
        ("IMMULOAD_LOOP_WAIT_MS", Some("0")),
        ("IMMULOAD_CONNECT_TIMEOUT_MS", Some("1500")),
        ("IMMULOAD_LOG_LEVEL", Some("debug")),
        ("IMMULOAD_LOG_LOCATION", Some("false")),
    ];

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();

        assert_eq!(config.connection.address, "db.internal");
        assert_eq!(config.connection.port, 4455);
        assert_eq!(config.connection.username, "loader");
        assert_eq!(config.connection.password, "secret");
        assert_eq!(config.connection.database(), Some("ledger"));
        assert_eq!(config.connection.connect_timeout, Duration::from_millis(1500));
        assert_eq!(config.workload.workers, 16);
        assert_eq!(config.workload.batch_size, 20);
        assert_eq!(config.workload.batch_pacing, Duration::from_millis(250));
        assert_eq!(config.workload.loop_size, 7);
        assert_eq!(config.workload.loop_pacing, Duration::ZERO);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(!config.logging.include_location);
    });
}

#[test]
fn test_empty_db_env_var_selects_nothing() {
    with_vars(vec![("IMMULOAD_DB", Some(""))], || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.connection.database(), None);
    });
}

#[test]
fn test_custom_prefix() {
    with_vars(
        vec![("LOADTEST_WORKERS", Some("3")), ("IMMULOAD_WORKERS", Some("9"))],
        || {
            let config = ConfigLoader::with_prefix("LOADTEST").from_env().unwrap();
            assert_eq!(config.workload.workers, 3);
        },
    );
}

#[test]
fn test_malformed_env_var_is_reported() {
    with_vars(vec![("IMMULOAD_PORT", Some("not-a-port"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
        assert!(err.to_string().contains("PORT"));
    });
}

#[test]
fn test_invalid_log_level_env_var() {
    with_vars(vec![("IMMULOAD_LOG_LEVEL", Some("shouty"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(err.to_string().contains("Invalid LOG_LEVEL"));
    });
}

#[test]
fn test_zero_workers_fails_validation() {
    with_vars(vec![("IMMULOAD_WORKERS", Some("0"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        match err {
            ConfigError::DomainError { domain, message } => {
                assert_eq!(domain, "workload");
                assert!(message.contains("workers"));
            }
            other => panic!("unexpected error: {other}"),
        }

        // Unvalidated loading leaves room for later overrides
        let config = ConfigLoader::new().from_env_unvalidated().unwrap();
        assert_eq!(config.workload.workers, 0);
    });
}

#[test]
fn test_malformed_log_location_env_var() {
    with_vars(vec![("IMMULOAD_LOG_LOCATION", Some("sometimes"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(err.to_string().contains("Invalid LOG_LOCATION"));
    });
}
