//! Contract for a generic queue service

use crate::error::QueueError;
use crate::message::Message;

/// Validation messages
pub const INVALID_QUEUE_URL: &str = "queue url must not be empty";
pub const INVALID_RECEIPT_HANDLE: &str = "receipt handle must not be empty";

/// Contract for a generic queue service.
///
/// Every backend serves the same three operations. A message returned by
/// [`QueueService::pull`] stays invisible to other consumers for the
/// backend's invisibility duration, and is permanently removed only by a
/// [`QueueService::delete`] matching its receipt handle.
///
/// All operations are synchronous: a call blocks the invoking thread until
/// the backend has finished (for the file backend, lock acquisition plus
/// the read-modify-write cycle).
pub trait QueueService {
    /// Pushes a message onto a queue. Creates the queue if it does not
    /// exist yet.
    fn push(&self, queue_url: &str, message: Message) -> Result<bool, QueueError>;

    /// Retrieves the first visible message of a queue, if any, starting
    /// its invisibility window.
    fn pull(&self, queue_url: &str) -> Result<Option<Message>, QueueError>;

    /// Deletes the message previously received by [`QueueService::pull`],
    /// matched by receipt handle. Returns whether anything was removed.
    fn delete(&self, queue_url: &str, message: &Message) -> Result<bool, QueueError>;
}

/// Validates that the queue url names a queue.
pub fn validate_queue_url(queue_url: &str) -> Result<(), QueueError> {
    if queue_url.is_empty() {
        return Err(QueueError::InvalidArgument(INVALID_QUEUE_URL));
    }
    Ok(())
}

/// Validates the receipt handle a delete matches on.
pub fn validate_receipt_handle(message: &Message) -> Result<(), QueueError> {
    if message.receipt_handle.is_empty() {
        return Err(QueueError::InvalidArgument(INVALID_RECEIPT_HANDLE));
    }
    Ok(())
}

/// Index of the first visible message in stored order.
///
/// First match rather than best match: stored order is insertion order,
/// so this preserves approximate FIFO.
pub fn find_visible_message(messages: &[Message]) -> Option<usize> {
    messages.iter().position(Message::is_visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};

    #[test]
    fn test_validate_queue_url_rejects_empty() {
        let error = validate_queue_url("").unwrap_err();
        assert!(matches!(
            error,
            QueueError::InvalidArgument(msg) if msg == INVALID_QUEUE_URL
        ));
        assert!(validate_queue_url("orders").is_ok());
    }

    #[test]
    fn test_validate_receipt_handle_rejects_empty() {
        let mut message = Message::new("hello");
        message.receipt_handle.clear();

        let error = validate_receipt_handle(&message).unwrap_err();
        assert!(matches!(
            error,
            QueueError::InvalidArgument(msg) if msg == INVALID_RECEIPT_HANDLE
        ));
    }

    #[test]
    fn test_find_visible_message_skips_invisible() {
        let hidden = Message::new("first").with_visible_from(Local::now() + Duration::minutes(1));
        let visible = Message::new("second");

        let messages = vec![hidden, visible.clone()];
        let index = find_visible_message(&messages).expect("second message is visible");
        assert_eq!(messages[index], visible);
    }

    #[test]
    fn test_find_visible_message_empty() {
        assert_eq!(find_visible_message(&[]), None);
    }
}
