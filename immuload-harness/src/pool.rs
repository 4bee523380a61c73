//! Worker pool: spawns the fleet and waits on the completion barrier

use crate::barrier::CompletionBarrier;
use crate::batch::{run_batches, WorkerSummary};
use crate::errors::PoolError;
use crate::ids::WorkerId;
use crate::session::SessionFactory;
use immuload_client::Connector;
use immuload_config::LoadConfig;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

/// Runs `workers` identical batch loops concurrently
pub struct WorkerPool {
    connector: Arc<dyn Connector>,
    config: Arc<LoadConfig>,
}

impl WorkerPool {
    pub fn new(connector: Arc<dyn Connector>, config: Arc<LoadConfig>) -> Self {
        Self { connector, config }
    }

    /// Spawn workers `1..=workers` and block until all of them finished.
    ///
    /// The returned summaries are ordered by worker id. The first setup error
    /// from any worker aborts the fleet and is returned instead.
    pub async fn run(&self) -> Result<Vec<WorkerSummary>, PoolError> {
        let workload = &self.config.workload;
        let factory = Arc::new(SessionFactory::new(
            Arc::clone(&self.connector),
            self.config.connection.clone(),
        ));

        info!(
            workers = workload.workers,
            batch_size = workload.batch_size,
            loop_size = workload.loop_size,
            "Starting fleet"
        );

        let mut barrier = CompletionBarrier::new();
        for ordinal in 1..=workload.workers {
            let worker = WorkerId::new(ordinal);
            let factory = Arc::clone(&factory);
            let config = Arc::clone(&self.config);
            barrier.spawn(
                worker,
                async move { run_batches(worker, &factory, &config.workload).await }
                    .instrument(info_span!("worker", worker = %worker)),
            );
        }

        let mut summaries = barrier.wait().await?;
        summaries.sort_by_key(|summary| summary.worker);

        info!(workers = summaries.len(), "Fleet finished");
        Ok(summaries)
    }
}
