//! Line-oriented message store
//!
//! One store file per queue at `<parent>/<queue>/messages`, one encoded
//! message per line in stored order. The store performs no locking of its
//! own: callers hold the queue's [`crate::LockManager`] lock around every
//! mutating call.
//!
//! A full overwrite is a plain truncating write. The queue lock serializes
//! cooperating processes; crash-atomicity is out of scope for this
//! backend.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use rustmq_core::Message;
use thiserror::Error;

use crate::codec::{self, CodecError};

/// Name of the per-queue store file
pub const MESSAGES_FILE_NAME: &str = "messages";

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("corrupt store line: {0}")]
    Codec(#[from] CodecError),
}

/// Line-oriented persistence for queues below one parent directory.
#[derive(Debug, Clone)]
pub struct QueueStore {
    parent_dir: PathBuf,
}

impl QueueStore {
    pub fn new(parent_dir: impl Into<PathBuf>) -> Self {
        Self {
            parent_dir: parent_dir.into(),
        }
    }

    /// Path of the store file for a queue.
    pub fn messages_path(&self, queue_url: &str) -> PathBuf {
        self.parent_dir.join(queue_url).join(MESSAGES_FILE_NAME)
    }

    /// Whether the queue's store exists. The only operation callable
    /// without the queue lock.
    pub fn exists(&self, queue_url: &str) -> bool {
        self.messages_path(queue_url).is_file()
    }

    /// Create an empty store and its containing directory. Not
    /// idempotent: callers check [`QueueStore::exists`] first.
    pub fn create(&self, queue_url: &str) -> Result<(), StoreError> {
        let path = self.messages_path(queue_url);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::File::create(&path)?;
        Ok(())
    }

    /// All messages of a queue in stored order. An empty store yields an
    /// empty vec; blank lines are skipped.
    pub fn read_all(&self, queue_url: &str) -> Result<Vec<Message>, StoreError> {
        let text = fs::read_to_string(self.messages_path(queue_url))?;
        text.lines()
            .filter(|line| !line.is_empty())
            .map(|line| codec::decode(line).map_err(StoreError::from))
            .collect()
    }

    /// Append one encoded message to an existing store; the fast path for
    /// pushing onto a queue that already exists.
    pub fn append_one(&self, queue_url: &str, message: &Message) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(self.messages_path(queue_url))?;
        writeln!(file, "{}", codec::encode(message))?;
        Ok(())
    }

    /// Replace the whole store content with the given messages, in order.
    /// Used for queue creation with the first message, every visibility
    /// update and every removal.
    pub fn overwrite_all(&self, queue_url: &str, messages: &[Message]) -> Result<(), StoreError> {
        let mut text = String::new();
        for message in messages {
            text.push_str(&codec::encode(message));
            text.push('\n');
        }
        fs::write(self.messages_path(queue_url), text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> QueueStore {
        QueueStore::new(dir.path())
    }

    #[test]
    fn test_create_then_exists_and_empty_read() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(!store.exists("orders"));
        store.create("orders").unwrap();
        assert!(store.exists("orders"));
        assert!(store.read_all("orders").unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_stored_order() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.create("orders").unwrap();

        let first = Message::new("hello1");
        let second = Message::new("hello2");
        store.append_one("orders", &first).unwrap();
        store.append_one("orders", &second).unwrap();

        let messages = store.read_all("orders").unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, first.id);
        assert_eq!(messages[1].id, second.id);
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.create("orders").unwrap();

        store
            .overwrite_all("orders", &[Message::new("a"), Message::new("b")])
            .unwrap();
        store.overwrite_all("orders", &[]).unwrap();

        assert!(store.read_all("orders").unwrap().is_empty());
    }

    #[test]
    fn test_append_after_overwrite_to_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.create("orders").unwrap();

        store.overwrite_all("orders", &[]).unwrap();
        store.append_one("orders", &Message::new("hello")).unwrap();

        let messages = store.read_all("orders").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hello");
    }

    #[test]
    fn test_read_missing_store_is_io_error() {
        let dir = TempDir::new().unwrap();
        let error = store(&dir).read_all("nonexistent").unwrap_err();
        assert!(matches!(error, StoreError::Io(_)));
    }

    #[test]
    fn test_read_corrupt_line_is_codec_error() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.create("orders").unwrap();
        fs::write(store.messages_path("orders"), "garbage\n").unwrap();

        let error = store.read_all("orders").unwrap_err();
        assert!(matches!(error, StoreError::Codec(_)));
    }
}
