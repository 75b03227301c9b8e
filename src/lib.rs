//! fsstress - filesystem stress-testing harness
//!
//! fsstress measures raw throughput of file create, open and write operations
//! on a storage backend (local disk, network share, custom filesystem driver)
//! under configurable concurrency and a fixed wall-clock duration per phase.
//!
//! # Architecture
//!
//! - **Timed phases**: prepare, start N workers, sleep, stop, join, aggregate
//! - **Lock-free workers**: each worker owns its directory tree and counters
//! - **Four workloads**: create, open/overwrite, small writes, large writes
//! - **Append-only results**: one CSV line per phase, mirrored to the console

pub mod config;
pub mod coordinator;
pub mod error;
pub mod output;
pub mod stats;
pub mod target;
pub mod util;
pub mod worker;
pub mod workload;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::TimedRunController;
pub use error::StressError;

/// Result type used throughout fsstress
pub type Result<T> = anyhow::Result<T>;
