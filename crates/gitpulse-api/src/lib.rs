//! GitPulse HTTP API.
//!
//! Routes webhook ingestion, event listing, health probes, and the static
//! activity page. Handlers receive storage and clock through shared
//! application state rather than process-wide globals.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use gitpulse_core::{Clock, Storage};

pub mod config;
pub mod handlers;
pub mod server;

pub use config::Config;
pub use server::{create_router, start_server};

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database access layer.
    pub storage: Storage,
    /// Time source for health reporting.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates application state over the given storage and clock.
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }
}
