//! Resilience helpers.
//!
//! Only the header subscription is ever retried, and only when
//! `watcher.resubscribe` is enabled. Block fetches and notifications are
//! single-shot.

pub mod backoff;

pub use backoff::ResubscribeBackoff;
