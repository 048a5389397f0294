//! Core domain types and event processing for GitPulse.
//!
//! Provides the canonical event model, the webhook payload normalizer, the
//! display formatter, and the PostgreSQL storage layer. The HTTP crate and
//! the service binary depend on these foundational types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod format;
pub mod models;
pub mod normalize;
pub mod storage;
pub mod time;

pub use error::{CoreError, Result};
pub use format::{format_message, render_timestamp};
pub use models::{EventId, EventType, NewEvent, StoredEvent};
pub use normalize::{normalize, Skip};
pub use storage::Storage;
pub use time::{Clock, RealClock, TestClock};
