//! Amazon SQS adapter backend for RustMQ
//!
//! A thin pass-through implementing the [`rustmq_core::QueueService`]
//! contract against a hosted SQS endpoint. Queue semantics (visibility,
//! receipt handles, retention) are owned by the remote service; this crate
//! only maps the wire types onto the core model.

pub mod service;

pub use service::SqsQueueService;
