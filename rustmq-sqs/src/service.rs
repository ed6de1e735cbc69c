//! Synchronous facade over the Amazon SQS client

use std::io;

use aws_config::BehaviorVersion;
use aws_sdk_sqs::Client;
use chrono::{Duration, Local};
use tokio::runtime::Runtime;
use tracing::info;

use rustmq_core::{
    validate_queue_url, validate_receipt_handle, Message, Operation, QueueError, QueueService,
};

/// SQS caps the visibility timeout at 12 hours
const MAX_VISIBILITY_SECS: i64 = 43_200;

/// A queue service delegating to Amazon SQS.
///
/// The adapter owns a current-thread tokio runtime and drives the async
/// SDK with `block_on`, which keeps the [`QueueService`] contract
/// synchronous. Do not construct or call it from inside an async runtime.
///
/// `queue_url` must be the full SQS queue URL; queues are managed on the
/// AWS side and are not created on push.
pub struct SqsQueueService {
    client: Client,
    runtime: Runtime,
    invisibility: Duration,
}

impl SqsQueueService {
    /// Adapter around an existing client, hiding pulled messages for
    /// `invisibility`.
    pub fn new(client: Client, invisibility: Duration) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            client,
            runtime,
            invisibility,
        })
    }

    /// Adapter with a client built from the ambient AWS configuration
    /// (environment, profile, instance role).
    pub fn from_env(invisibility: Duration) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let config = runtime.block_on(aws_config::load_defaults(BehaviorVersion::latest()));
        Ok(Self {
            client: Client::new(&config),
            runtime,
            invisibility,
        })
    }

    /// Adapter with the default SQS visibility timeout of 30 seconds.
    pub fn from_env_with_default_visibility() -> io::Result<Self> {
        Self::from_env(Duration::seconds(30))
    }

    fn visibility_timeout_secs(&self) -> i32 {
        self.invisibility.num_seconds().clamp(0, MAX_VISIBILITY_SECS) as i32
    }
}

impl QueueService for SqsQueueService {
    fn push(&self, queue_url: &str, message: Message) -> Result<bool, QueueError> {
        validate_queue_url(queue_url)?;

        self.runtime
            .block_on(
                self.client
                    .send_message()
                    .queue_url(queue_url)
                    .message_body(&message.content)
                    .send(),
            )
            .map_err(|e| QueueError::storage(Operation::Push, queue_url, e))?;

        info!(queue = %queue_url, "pushed message to sqs");
        Ok(true)
    }

    fn pull(&self, queue_url: &str) -> Result<Option<Message>, QueueError> {
        validate_queue_url(queue_url)?;

        let output = self
            .runtime
            .block_on(
                self.client
                    .receive_message()
                    .queue_url(queue_url)
                    .max_number_of_messages(1)
                    .visibility_timeout(self.visibility_timeout_secs())
                    .send(),
            )
            .map_err(|e| QueueError::storage(Operation::Pull, queue_url, e))?;

        let received = output.messages().first().map(|msg| {
            Message::from_parts(
                msg.message_id().unwrap_or_default(),
                msg.receipt_handle().unwrap_or_default(),
                msg.body().unwrap_or_default(),
                Local::now() + self.invisibility,
            )
        });

        info!(queue = %queue_url, received = received.is_some(), "pulled from sqs");
        Ok(received)
    }

    fn delete(&self, queue_url: &str, message: &Message) -> Result<bool, QueueError> {
        validate_queue_url(queue_url)?;
        validate_receipt_handle(message)?;

        self.runtime
            .block_on(
                self.client
                    .delete_message()
                    .queue_url(queue_url)
                    .receipt_handle(&message.receipt_handle)
                    .send(),
            )
            .map_err(|e| QueueError::storage(Operation::Delete, queue_url, e))?;

        info!(queue = %queue_url, "deleted message from sqs");
        Ok(true)
    }
}
