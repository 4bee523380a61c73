//! Load generation harness for immuload
//!
//! A [`WorkerPool`] runs a fleet of identical workers. Each worker opens
//! `batch_size` sessions one after the other and issues `loop_size` probe
//! pairs on every session, with jittered pauses between iterations. A
//! [`CompletionBarrier`] waits for the whole fleet; any session setup failure
//! aborts it.

pub mod barrier;
pub mod batch;
pub mod errors;
pub mod ids;
pub mod jitter;
pub mod memory;
pub mod pool;
pub mod probe_loop;
pub mod session;

// Re-export main types for convenience
pub use barrier::CompletionBarrier;
pub use batch::{run_batches, WorkerSummary};
pub use errors::{PoolError, SetupError, SetupStage};
pub use ids::{BatchIndex, WorkerId};
pub use jitter::JitterTimer;
pub use memory::{InMemoryService, ProbeKind, ProbeRecord, ServiceStats};
pub use pool::WorkerPool;
pub use probe_loop::run_probe_loop;
pub use session::{Session, SessionFactory};
