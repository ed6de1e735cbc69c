//! In-memory queue backend for RustMQ
//!
//! Implements the [`rustmq_core::QueueService`] contract on a concurrent
//! map of in-process queues. Nothing is persisted and nothing crosses a
//! process boundary; useful for tests and single-process deployments.

pub mod service;

pub use service::InMemoryQueueService;
