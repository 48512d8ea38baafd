//! Summary statistics over a run's trials and the session-scoped slot that
//! holds the last completed run.

pub mod error;
pub mod metrics;
pub mod storage;
pub mod store;

pub use error::StorageError;
pub use metrics::{Summary, compute_accuracy, compute_avg_rt};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{SESSION_KEY, SessionStore};
