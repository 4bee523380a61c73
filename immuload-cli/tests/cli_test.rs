use assert_cmd::Command;
use predicates::prelude::*;
use std::net::TcpListener;

fn immuload() -> Command {
    let mut cmd = Command::cargo_bin("immuload").unwrap();
    for var in [
        "RUST_LOG",
        "IMMULOAD_ADDR",
        "IMMULOAD_PORT",
        "IMMULOAD_DB",
        "IMMULOAD_WORKERS",
        "IMMULOAD_BATCH_SIZE",
        "IMMULOAD_LOOP_SIZE",
        "IMMULOAD_LOG_LEVEL",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// A local port with nothing listening on it
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn test_help_lists_flags() {
    immuload()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--batch-size"))
        .stdout(predicate::str::contains("--loop-wait"))
        .stdout(predicate::str::contains("--offline"));
}

#[test]
fn test_zero_workers_is_rejected() {
    immuload()
        .args(["--workers", "0", "--offline"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"))
        .stderr(predicate::str::contains("workers"));
}

#[test]
fn test_zero_workers_from_environment_is_rejected() {
    immuload()
        .env("IMMULOAD_WORKERS", "0")
        .arg("--offline")
        .assert()
        .failure();
}

#[test]
fn test_flag_overrides_environment() {
    immuload()
        .env("IMMULOAD_WORKERS", "0")
        .args(["--workers", "2", "--offline", "--batch-wait", "0", "--loop-wait", "0"])
        .assert()
        .success();
}

#[test]
fn test_malformed_port_is_rejected() {
    immuload().args(["--port", "not-a-port"]).assert().failure();
}

#[test]
fn test_zero_batch_size_needs_no_server() {
    let port = closed_port().to_string();
    immuload()
        .args(["--port", port.as_str(), "--workers", "3", "--batch-size", "0"])
        .assert()
        .success();
}

#[test]
fn test_unreachable_server_aborts_with_error() {
    let port = closed_port().to_string();
    immuload()
        .args([
            "--port",
            port.as_str(),
            "--workers",
            "2",
            "--connect-timeout",
            "2000",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Load run aborted"))
        .stderr(predicate::str::contains("failed to connect"));
}

#[test]
fn test_offline_run_completes() {
    immuload()
        .args([
            "--offline",
            "--workers",
            "3",
            "--batchsize",
            "2",
            "--loopsize",
            "2",
            "--batchwait",
            "1",
            "--loopwait",
            "1",
            "--db",
            "ledger",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("client 1:0 starting"))
        .stdout(predicate::str::contains("client 1:0 end"))
        .stdout(predicate::str::contains("client 3:1 starting"))
        .stdout(predicate::str::contains("client 3:1 end"))
        .stdout(predicate::str::contains("All workers completed"));
}
