//! RustMQ - SQS-style message queues over files or hosted SQS
//!
//! One-shot command line for pushing, pulling and deleting messages
//! against a chosen backend. A pulled message stays invisible to other
//! consumers for the configured visibility window; delete it with the
//! receipt handle printed by `pull`.

mod config;

use chrono::{Duration, Local};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{BackendKind, Config};
use rustmq_core::{Message, QueueService};
use rustmq_file::FileQueueService;
use rustmq_sqs::SqsQueueService;

#[derive(Parser, Debug)]
#[command(name = "rustmq")]
#[command(about = "SQS-style message queues over files or hosted SQS", long_about = None)]
struct Args {
    /// Backend to talk to
    #[arg(long, value_enum, env = "RUSTMQ_BACKEND")]
    backend: Option<BackendKind>,

    /// Parent directory holding the file backend's queues
    #[arg(long, env = "RUSTMQ_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Seconds a pulled message stays invisible
    #[arg(long, env = "RUSTMQ_VISIBILITY_SECS")]
    visibility_secs: Option<i64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUSTMQ_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Push a message onto a queue
    Push { queue: String, content: String },

    /// Pull the first visible message from a queue
    Pull { queue: String },

    /// Delete a pulled message by its receipt handle
    Delete {
        queue: String,
        receipt_handle: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("rustmq={0},rustmq_file={0},rustmq_sqs={0}", args.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let backend = args.backend.unwrap_or(config.backend);
    let data_dir = args.data_dir.unwrap_or(config.data_dir);
    let visibility = Duration::seconds(args.visibility_secs.unwrap_or(config.visibility_secs));

    let service: Box<dyn QueueService> = match backend {
        BackendKind::File => Box::new(FileQueueService::new(data_dir, visibility)),
        BackendKind::Sqs => Box::new(SqsQueueService::from_env(visibility)?),
    };

    match args.command {
        Command::Push { queue, content } => {
            let message = Message::new(content);
            service.push(&queue, message.clone())?;
            println!("{}", serde_json::to_string_pretty(&message)?);
        }
        Command::Pull { queue } => match service.pull(&queue)? {
            Some(message) => println!("{}", serde_json::to_string_pretty(&message)?),
            None => println!("no visible message"),
        },
        Command::Delete {
            queue,
            receipt_handle,
        } => {
            // delete matches on the receipt handle alone
            let message = Message::from_parts("", receipt_handle, "", Local::now());
            let removed = service.delete(&queue, &message)?;
            println!("{}", if removed { "deleted" } else { "not found" });
        }
    }

    Ok(())
}
