//! Harness error types

use crate::ids::{BatchIndex, WorkerId};
use immuload_client::ClientError;
use std::fmt;

/// Step of session establishment that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    Connect,
    Authenticate,
    SelectDatabase,
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupStage::Connect => write!(f, "connect"),
            SetupStage::Authenticate => write!(f, "login"),
            SetupStage::SelectDatabase => write!(f, "use the database"),
        }
    }
}

/// Session establishment failure; fatal for the whole fleet
#[derive(Debug, thiserror::Error)]
#[error("Client {worker}:{batch} failed to {stage}. Reason: {cause}")]
pub struct SetupError {
    pub stage: SetupStage,
    pub worker: WorkerId,
    pub batch: BatchIndex,
    pub cause: ClientError,
}

impl SetupError {
    pub fn new(stage: SetupStage, worker: WorkerId, batch: BatchIndex, cause: ClientError) -> Self {
        Self {
            stage,
            worker,
            batch,
            cause,
        }
    }
}

/// Why the worker pool did not complete normally
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Fleet aborted: {0}")]
    Setup(#[from] SetupError),

    #[error("Worker {worker} panicked: {message}")]
    WorkerPanicked { worker: WorkerId, message: String },
}
