//! Outbound notifications.
//!
//! The watcher hands each formatted deposit message to a [`Notifier`].
//! Delivery problems are reported through [`NotifyOutcome`] and logged by the
//! notifier itself; they never propagate as errors.

pub mod telegram;

use async_trait::async_trait;

pub use telegram::TelegramNotifier;

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The service accepted the message.
    Delivered,
    /// The service answered but refused the message.
    Rejected { description: Option<String> },
    /// Transport or decoding failure.
    Failed(String),
    /// No credentials configured, nothing sent.
    Skipped,
}

/// Sink for human-readable deposit messages.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Deliver one message. Never fails the caller.
    async fn notify(&self, message: &str) -> NotifyOutcome;
}
