//! Per-worker batch loop

use crate::errors::SetupError;
use crate::ids::{BatchIndex, WorkerId};
use crate::jitter::JitterTimer;
use crate::probe_loop::run_probe_loop;
use crate::session::SessionFactory;
use immuload_config::WorkloadConfig;
use tracing::info;

/// What one worker did before finishing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
    pub worker: WorkerId,
    pub sessions: u64,
    pub probe_pairs: u64,
}

/// Run `batch_size` sessions one after the other for `worker`.
///
/// Each batch iteration opens a fresh session, runs the probe loop on it and
/// releases it before the next iteration starts. Batches are separated by a
/// jittered pause; no pause follows the last one. A setup failure ends the
/// worker immediately and is returned for the pool to act on.
pub async fn run_batches(
    worker: WorkerId,
    factory: &SessionFactory,
    workload: &WorkloadConfig,
) -> Result<WorkerSummary, SetupError> {
    let batch_pacing = JitterTimer::new(workload.batch_pacing);
    let loop_pacing = JitterTimer::new(workload.loop_pacing);

    let mut summary = WorkerSummary {
        worker,
        sessions: 0,
        probe_pairs: 0,
    };

    for index in 0..workload.batch_size {
        if index > 0 {
            batch_pacing.pause().await;
        }

        let batch = BatchIndex::new(index);
        info!("client {}:{} starting", worker, batch);

        let mut session = factory.establish(worker, batch).await?;
        summary.probe_pairs += run_probe_loop(&mut session, workload.loop_size, &loop_pacing).await;
        session.close().await;
        summary.sessions += 1;
        info!("client {}:{} end", worker, batch);
    }

    Ok(summary)
}
