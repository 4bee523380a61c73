//! CLI argument parsing definitions

use clap::Parser;
use immuload_config::LoadConfig;
use std::time::Duration;

/// Every flag is optional; an absent flag leaves the environment or default
/// value in place.
#[derive(Parser, Debug)]
#[command(name = "immuload", author, version, about, long_about = None)]
pub struct Cli {
    /// Address of the immudb server
    #[arg(long, value_name = "HOST")]
    pub addr: Option<String>,

    /// gRPC port of the immudb server
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Username used to log in
    #[arg(long, value_name = "USER")]
    pub user: Option<String>,

    /// Password used to log in
    #[arg(long, value_name = "PASSWORD")]
    pub pass: Option<String>,

    /// Database to select after login (empty selects none)
    #[arg(long, value_name = "NAME")]
    pub db: Option<String>,

    /// Number of concurrent workers
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Sessions opened by each worker
    #[arg(long, alias = "batchsize", value_name = "N")]
    pub batch_size: Option<u64>,

    /// Mean pause between sessions of one worker, in milliseconds
    #[arg(long, alias = "batchwait", value_name = "MS")]
    pub batch_wait: Option<u64>,

    /// Health/state probe pairs per session
    #[arg(long, alias = "loopsize", value_name = "N")]
    pub loop_size: Option<u64>,

    /// Mean pause between probe pairs, in milliseconds
    #[arg(long, alias = "loopwait", value_name = "MS")]
    pub loop_wait: Option<u64>,

    /// Connection establishment timeout, in milliseconds
    #[arg(long, value_name = "MS")]
    pub connect_timeout: Option<u64>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Run against an in-process stand-in instead of a server
    #[arg(long)]
    pub offline: bool,
}

impl Cli {
    /// Apply the flags that were given on top of `config`
    pub fn apply(&self, config: &mut LoadConfig) {
        let connection = &mut config.connection;
        if let Some(addr) = &self.addr {
            connection.address = addr.clone();
        }
        if let Some(port) = self.port {
            connection.port = port;
        }
        if let Some(user) = &self.user {
            connection.username = user.clone();
        }
        if let Some(pass) = &self.pass {
            connection.password = pass.clone();
        }
        if let Some(db) = &self.db {
            connection.set_database(db.as_str());
        }
        if let Some(ms) = self.connect_timeout {
            connection.connect_timeout = Duration::from_millis(ms);
        }

        let workload = &mut config.workload;
        if let Some(workers) = self.workers {
            workload.workers = workers;
        }
        if let Some(batch_size) = self.batch_size {
            workload.batch_size = batch_size;
        }
        if let Some(ms) = self.batch_wait {
            workload.batch_pacing = Duration::from_millis(ms);
        }
        if let Some(loop_size) = self.loop_size {
            workload.loop_size = loop_size;
        }
        if let Some(ms) = self.loop_wait {
            workload.loop_pacing = Duration::from_millis(ms);
        }
    }
}
