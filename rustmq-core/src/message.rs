//! Message model shared by every queue backend

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A queued message: an immutable identity plus a visibility marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque unique token, assigned at creation, constant for the
    /// message's lifetime.
    pub id: String,
    /// Opaque unique token handed back by pull; the sole key a delete
    /// matches on.
    pub receipt_handle: String,
    /// Text payload. The file backend's line format carries no escaping,
    /// so content must not contain `:` or a newline (see `rustmq-file`).
    pub content: String,
    /// The message is visible iff the current time has reached this point.
    /// Advanced into the future by the invisibility duration on every
    /// successful pull, never mutated otherwise.
    pub visible_from: DateTime<Local>,
}

impl Message {
    /// Create a message with fresh id and receipt handle, visible
    /// immediately.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            receipt_handle: Uuid::new_v4().to_string(),
            content: content.into(),
            visible_from: Local::now(),
        }
    }

    /// Reassemble a message from stored or remote parts.
    pub fn from_parts(
        id: impl Into<String>,
        receipt_handle: impl Into<String>,
        content: impl Into<String>,
        visible_from: DateTime<Local>,
    ) -> Self {
        Self {
            id: id.into(),
            receipt_handle: receipt_handle.into(),
            content: content.into(),
            visible_from,
        }
    }

    /// Whether the message is currently visible to consumers.
    pub fn is_visible(&self) -> bool {
        Local::now() >= self.visible_from
    }

    /// Copy of this message with the visibility marker moved. Backends
    /// store the returned value instead of mutating a shared instance.
    #[must_use]
    pub fn with_visible_from(&self, visible_from: DateTime<Local>) -> Self {
        Self {
            visible_from,
            ..self.clone()
        }
    }
}
