//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! watcher / notifier / chain client
//!     → tracing events with structured fields
//!     → logging.rs (JSON lines)
//!         → stdout
//!         → deposit-tracker.log (append-only)
//! ```

pub mod logging;

pub use logging::{init_logging, json_layer, LoggingError};
