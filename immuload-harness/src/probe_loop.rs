//! Probe traffic inside one session

use crate::jitter::JitterTimer;
use crate::session::Session;
use tracing::trace;

/// Issue `loop_size` probe pairs (health, then current state) on `session`,
/// pausing between pairs but not after the last one.
///
/// Probe failures are load, not faults: they are traced and the loop moves
/// on. Returns the number of pairs issued.
pub async fn run_probe_loop(session: &mut Session, loop_size: u64, pacing: &JitterTimer) -> u64 {
    for iteration in 0..loop_size {
        if iteration > 0 {
            pacing.pause().await;
        }

        if let Err(e) = session.health().await {
            trace!(worker = %session.worker(), iteration, error = %e, "Health probe failed");
        }
        if let Err(e) = session.current_state().await {
            trace!(worker = %session.worker(), iteration, error = %e, "State probe failed");
        }
    }
    loop_size
}
