//! File-backed queue backend for RustMQ
//!
//! Implements the [`rustmq_core::QueueService`] contract on top of plain
//! files, safe across unrelated processes sharing one filesystem:
//! - one line-oriented store per queue (`<parent>/<queue>/messages`)
//! - inter-process mutual exclusion from atomic creation of a `.lock`
//!   marker directory next to the store

pub mod codec;
pub mod lock;
pub mod service;
pub mod store;

pub use lock::{LockGuard, LockManager};
pub use service::FileQueueService;
pub use store::QueueStore;
