//! File-backed queue service
//!
//! The sole entry point of this backend: validates input, brackets every
//! store access between lock acquisition and the guard's release, and
//! enforces the visibility semantics.

use std::path::PathBuf;

use chrono::{Duration, Local};
use tracing::info;

use rustmq_core::{
    find_visible_message, validate_queue_url, validate_receipt_handle, Message, Operation,
    QueueError, QueueService,
};

use crate::lock::{LockError, LockGuard, LockManager};
use crate::store::QueueStore;

/// A queue service using files as storage. Supports many producers and
/// many consumers, in unrelated processes sharing one filesystem.
///
/// Push appends to an existing store (creating it for the first message);
/// pull and delete rewrite the full store, because they reposition or
/// remove an arbitrary record. Operations other than push require the
/// queue to have been created by an earlier push: a missing store surfaces
/// as a storage fault.
///
/// A process that crashes between acquiring and releasing a queue's lock
/// strands the `.lock` marker, and the queue stays unavailable until the
/// marker is removed by hand.
#[derive(Debug, Clone)]
pub struct FileQueueService {
    locks: LockManager,
    store: QueueStore,
    invisibility: Duration,
}

impl FileQueueService {
    /// Backend rooted at `parent_dir`, hiding pulled messages for
    /// `invisibility`.
    pub fn new(parent_dir: impl Into<PathBuf>, invisibility: Duration) -> Self {
        let parent_dir = parent_dir.into();
        Self {
            locks: LockManager::new(&parent_dir),
            store: QueueStore::new(parent_dir),
            invisibility,
        }
    }

    /// Same backend with custom lock timing (tests shorten both bounds).
    #[must_use]
    pub fn with_lock_timing(
        mut self,
        retry_period: std::time::Duration,
        try_timeout: std::time::Duration,
    ) -> Self {
        self.locks = self.locks.with_timing(retry_period, try_timeout);
        self
    }

    fn lock(&self, operation: Operation, queue_url: &str) -> Result<LockGuard, QueueError> {
        self.locks.acquire(queue_url).map_err(|e| match e {
            LockError::Timeout { .. } => QueueError::LockTimeout {
                queue: queue_url.to_string(),
            },
            LockError::Io(io) => QueueError::storage(operation, queue_url, io),
        })
    }
}

impl QueueService for FileQueueService {
    fn push(&self, queue_url: &str, message: Message) -> Result<bool, QueueError> {
        validate_queue_url(queue_url)?;
        let _guard = self.lock(Operation::Push, queue_url)?;

        let result = if self.store.exists(queue_url) {
            self.store.append_one(queue_url, &message)
        } else {
            self.store.create(queue_url).and_then(|()| {
                self.store
                    .overwrite_all(queue_url, std::slice::from_ref(&message))
            })
        };
        result.map_err(|e| QueueError::storage(Operation::Push, queue_url, e))?;

        info!(queue = %queue_url, id = %message.id, "pushed message");
        Ok(true)
    }

    fn pull(&self, queue_url: &str) -> Result<Option<Message>, QueueError> {
        validate_queue_url(queue_url)?;
        let _guard = self.lock(Operation::Pull, queue_url)?;

        let mut messages = self
            .store
            .read_all(queue_url)
            .map_err(|e| QueueError::storage(Operation::Pull, queue_url, e))?;

        let Some(index) = find_visible_message(&messages) else {
            return Ok(None);
        };

        let updated = messages[index].with_visible_from(Local::now() + self.invisibility);
        messages[index] = updated.clone();
        self.store
            .overwrite_all(queue_url, &messages)
            .map_err(|e| QueueError::storage(Operation::Pull, queue_url, e))?;

        info!(queue = %queue_url, id = %updated.id, "pulled message");
        Ok(Some(updated))
    }

    fn delete(&self, queue_url: &str, message: &Message) -> Result<bool, QueueError> {
        validate_queue_url(queue_url)?;
        validate_receipt_handle(message)?;
        let _guard = self.lock(Operation::Delete, queue_url)?;

        let mut messages = self
            .store
            .read_all(queue_url)
            .map_err(|e| QueueError::storage(Operation::Delete, queue_url, e))?;

        let before = messages.len();
        messages.retain(|stored| stored.receipt_handle != message.receipt_handle);
        let removed = messages.len() != before;

        self.store
            .overwrite_all(queue_url, &messages)
            .map_err(|e| QueueError::storage(Operation::Delete, queue_url, e))?;

        info!(queue = %queue_url, removed, "deleted message");
        Ok(removed)
    }
}
