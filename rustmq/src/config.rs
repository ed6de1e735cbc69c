//! Configuration management

use clap::ValueEnum;
use serde::Deserialize;
use std::path::PathBuf;

/// Queue backend the CLI talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// File-backed queues below the data directory
    #[default]
    File,
    /// Hosted Amazon SQS queues
    Sqs,
}

/// File/environment configuration; CLI flags override these values.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendKind,

    /// Parent directory holding the file backend's queues
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Seconds a pulled message stays invisible
    #[serde(default = "default_visibility_secs")]
    pub visibility_secs: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: default_data_dir(),
            visibility_secs: default_visibility_secs(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".rustmq")
}

fn default_visibility_secs() -> i64 {
    30
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("rustmq").required(false))
            .add_source(config::Environment::with_prefix("RUSTMQ").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize::<Config>()?)
    }
}
