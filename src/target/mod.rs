//! Filesystem targets
//!
//! Naming and sharding of the per-worker directory trees ([`layout`]) and the
//! setup steps that clear them or pre-populate them ([`tree`]).

pub mod layout;
pub mod tree;

pub use tree::{DirectoryOps, RetryPolicy, StdFs};
