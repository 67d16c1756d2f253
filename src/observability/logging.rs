//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process-wide `tracing` subscriber once
//! - Write every event as one JSON record per line to stdout and to an append-only file
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - The file writer sits behind a mutex so concurrent tasks never interleave records

use std::fs::OpenOptions;
use std::sync::Mutex;

use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file '{path}': {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log filter: {0}")]
    Filter(String),

    #[error("logger already initialized: {0}")]
    Init(String),
}

/// JSON-lines formatting layer writing to `writer`.
pub fn json_layer<S, W>(writer: W) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
}

/// Install the global subscriber: stdout plus the configured log file.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|source| LoggingError::File {
            path: config.file.clone(),
            source,
        })?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| LoggingError::Filter(e.to_string()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer(std::io::stdout))
        .with(json_layer(Mutex::new(file)))
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
