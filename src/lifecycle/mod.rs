//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init logging → Connect → Subscribe → Watch
//! ```
//!
//! # Design Decisions
//! - No graceful shutdown; the process runs until killed
//! - The tracker state only moves Unsubscribed → Subscribed

pub mod startup;

pub use startup::{Tracker, TrackerState};
