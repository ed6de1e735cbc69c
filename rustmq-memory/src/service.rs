//! In-memory queue service

use std::collections::VecDeque;

use chrono::{Duration, Local};
use dashmap::DashMap;
use tracing::info;

use rustmq_core::{
    find_visible_message, validate_queue_url, validate_receipt_handle, Message, QueueError,
    QueueService,
};

/// A queue service using in-process memory. Supports many producer and
/// consumer threads within one process.
///
/// The queue registry is owned by the service value: construct one and
/// hand it (behind `Arc`) to every collaborator. Pulling from or deleting
/// on a queue that was never pushed to yields an empty result rather than
/// an error; there is no storage to fault on.
#[derive(Debug)]
pub struct InMemoryQueueService {
    queues: DashMap<String, VecDeque<Message>>,
    invisibility: Duration,
}

impl InMemoryQueueService {
    /// Backend hiding pulled messages for `invisibility`.
    pub fn new(invisibility: Duration) -> Self {
        Self {
            queues: DashMap::new(),
            invisibility,
        }
    }
}

impl QueueService for InMemoryQueueService {
    fn push(&self, queue_url: &str, message: Message) -> Result<bool, QueueError> {
        validate_queue_url(queue_url)?;

        let id = message.id.clone();
        // the queue is created on first use
        self.queues
            .entry(queue_url.to_string())
            .or_default()
            .push_back(message);

        info!(queue = %queue_url, id = %id, "pushed message");
        Ok(true)
    }

    fn pull(&self, queue_url: &str) -> Result<Option<Message>, QueueError> {
        validate_queue_url(queue_url)?;

        let Some(mut queue) = self.queues.get_mut(queue_url) else {
            return Ok(None);
        };

        let messages = queue.make_contiguous();
        let Some(index) = find_visible_message(messages) else {
            return Ok(None);
        };

        let updated = messages[index].with_visible_from(Local::now() + self.invisibility);
        messages[index] = updated.clone();

        info!(queue = %queue_url, id = %updated.id, "pulled message");
        Ok(Some(updated))
    }

    fn delete(&self, queue_url: &str, message: &Message) -> Result<bool, QueueError> {
        validate_queue_url(queue_url)?;
        validate_receipt_handle(message)?;

        let Some(mut queue) = self.queues.get_mut(queue_url) else {
            return Ok(false);
        };

        let before = queue.len();
        queue.retain(|stored| stored.receipt_handle != message.receipt_handle);
        let removed = queue.len() != before;

        info!(queue = %queue_url, removed, "deleted message");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> InMemoryQueueService {
        InMemoryQueueService::new(Duration::seconds(10))
    }

    #[test]
    fn test_push_creates_queue_and_returns_true() {
        let queue = service();
        assert!(queue.push("orders", Message::new("hello")).unwrap());
        assert!(queue.push("orders", Message::new("hello")).unwrap());
    }

    #[test]
    fn test_pull_returns_visible_message() {
        let queue = service();
        let message = Message::new("hello");
        queue.push("orders", message.clone()).unwrap();

        let received = queue.pull("orders").unwrap().expect("message is visible");
        assert_eq!(received.id, message.id);
        assert_eq!(received.content, "hello");
    }

    #[test]
    fn test_pull_on_unknown_queue_returns_none() {
        assert!(service().pull("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_pull_hides_message_for_invisibility_window() {
        let queue = service();
        queue.push("orders", Message::new("hello")).unwrap();

        let received = queue.pull("orders").unwrap().unwrap();
        assert!(received.visible_from > Local::now());
        assert!(queue.pull("orders").unwrap().is_none());
    }

    #[test]
    fn test_pull_returns_next_visible_when_head_is_hidden() {
        let queue = service();
        queue.push("orders", Message::new("hello1")).unwrap();
        queue.push("orders", Message::new("hello2")).unwrap();

        queue.pull("orders").unwrap();
        let received = queue.pull("orders").unwrap().expect("second is visible");
        assert_eq!(received.content, "hello2");
    }

    #[test]
    fn test_pull_follows_fifo() {
        let queue = service();
        queue.push("orders", Message::new("hello1")).unwrap();
        queue.push("orders", Message::new("hello2")).unwrap();

        assert_eq!(queue.pull("orders").unwrap().unwrap().content, "hello1");
        assert_eq!(queue.pull("orders").unwrap().unwrap().content, "hello2");
    }

    #[test]
    fn test_pull_returns_message_again_after_window_elapses() {
        let queue = InMemoryQueueService::new(Duration::milliseconds(100));
        queue.push("orders", Message::new("hello")).unwrap();

        let first = queue.pull("orders").unwrap().unwrap();
        assert!(queue.pull("orders").unwrap().is_none());

        std::thread::sleep(std::time::Duration::from_millis(150));

        let second = queue.pull("orders").unwrap().expect("window elapsed");
        assert_eq!(second.id, first.id);
    }

    #[test]
    fn test_delete_succeeds_exactly_once_per_receipt_handle() {
        let queue = service();
        queue.push("orders", Message::new("hello")).unwrap();

        let received = queue.pull("orders").unwrap().unwrap();
        assert!(queue.delete("orders", &received).unwrap());
        assert!(!queue.delete("orders", &received).unwrap());
    }

    #[test]
    fn test_delete_on_unknown_queue_returns_false() {
        let queue = service();
        assert!(!queue.delete("nonexistent", &Message::new("hello")).unwrap());
    }

    #[test]
    fn test_validation_rejects_empty_arguments() {
        let queue = service();

        assert!(matches!(
            queue.push("", Message::new("hello")).unwrap_err(),
            QueueError::InvalidArgument(_)
        ));

        let mut message = Message::new("hello");
        message.receipt_handle.clear();
        assert!(matches!(
            queue.delete("orders", &message).unwrap_err(),
            QueueError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_concurrent_pushers_lose_nothing() {
        use std::collections::HashSet;

        let queue = service();
        let pushers = 8;

        std::thread::scope(|scope| {
            for i in 0..pushers {
                let queue = &queue;
                scope.spawn(move || {
                    queue
                        .push("orders", Message::new(format!("message-{i}")))
                        .unwrap();
                });
            }
        });

        let mut contents = HashSet::new();
        while let Some(message) = queue.pull("orders").unwrap() {
            contents.insert(message.content);
        }

        let expected: HashSet<String> = (0..pushers).map(|i| format!("message-{i}")).collect();
        assert_eq!(contents, expected);
    }
}
