//! Core types and traits for RustMQ
//!
//! This crate provides the message model, the `QueueService` contract and
//! the error types shared by every queue backend.

pub mod error;
pub mod message;
pub mod service;

pub use error::{Operation, QueueError};
pub use message::Message;
pub use service::{
    find_visible_message, validate_queue_url, validate_receipt_handle, QueueService,
};
