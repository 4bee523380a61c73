//! Completion barrier over a fleet of worker tasks
//!
//! Every spawned worker is counted exactly once when it finishes, whether it
//! returned normally, returned a setup error or panicked. The first setup
//! error short-circuits the barrier: the remaining workers are aborted and
//! the error is handed to the caller.

use crate::errors::{PoolError, SetupError};
use crate::ids::WorkerId;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use tokio::task::{self, JoinError, JoinSet};
use tracing::{error, warn};

pub struct CompletionBarrier<T> {
    tasks: JoinSet<Result<T, SetupError>>,
    workers: HashMap<task::Id, WorkerId>,
    expected: usize,
}

impl<T: Send + 'static> CompletionBarrier<T> {
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            workers: HashMap::new(),
            expected: 0,
        }
    }

    /// Spawn a worker onto the runtime and register it with the barrier
    pub fn spawn<F>(&mut self, worker: WorkerId, future: F)
    where
        F: Future<Output = Result<T, SetupError>> + Send + 'static,
    {
        let handle = self.tasks.spawn(future);
        self.workers.insert(handle.id(), worker);
        self.expected += 1;
    }

    /// Wait until every registered worker has finished.
    ///
    /// Results come back in completion order. A panicked worker is counted
    /// and the barrier keeps waiting for the others before reporting the
    /// first panic. A setup error aborts every worker still running and is
    /// returned once they have all stopped.
    pub async fn wait(mut self) -> Result<Vec<T>, PoolError> {
        let mut results = Vec::with_capacity(self.expected);
        let mut completed = 0usize;
        let mut first_panic: Option<PoolError> = None;

        while let Some(joined) = self.tasks.join_next_with_id().await {
            match joined {
                Ok((id, Ok(value))) => {
                    self.workers.remove(&id);
                    completed += 1;
                    results.push(value);
                }
                Ok((id, Err(setup))) => {
                    self.workers.remove(&id);
                    error!("{}", setup);
                    let running = self.tasks.len();
                    if running > 0 {
                        warn!(running, "Aborting remaining workers");
                    }
                    self.tasks.shutdown().await;
                    return Err(PoolError::Setup(setup));
                }
                Err(join_error) => {
                    completed += 1;
                    // Every task is registered at spawn
                    let worker = self.workers.remove(&join_error.id());
                    debug_assert!(worker.is_some());
                    let message = failure_message(join_error);
                    if let Some(worker) = worker {
                        error!(worker = %worker, "Worker terminated abnormally: {}", message);
                        first_panic.get_or_insert(PoolError::WorkerPanicked { worker, message });
                    }
                }
            }
        }

        debug_assert_eq!(completed, self.expected);
        match first_panic {
            Some(panic) => Err(panic),
            None => Ok(results),
        }
    }
}

impl<T: Send + 'static> Default for CompletionBarrier<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn failure_message(join_error: JoinError) -> String {
    if !join_error.is_panic() {
        return "cancelled".to_string();
    }
    panic_payload_message(join_error.into_panic())
}

fn panic_payload_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
